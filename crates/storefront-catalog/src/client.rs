//! HTTP client for the storefront's product-detail route.

use std::time::Duration;

use reqwest::{Client, Url};
use storefront_core::{AppConfig, Handle, Product};

use crate::error::CatalogError;
use crate::normalize::normalize_product;
use crate::source::ProductSource;
use crate::types::ProductDetailResponse;

const PRODUCT_DETAIL_PATH: &str = "api/shopify/product";

/// HTTP client for `GET {base}/api/shopify/product?handle=...`.
///
/// Non-2xx responses and unparseable bodies are typed errors; a `null`
/// product is `Ok(None)`. Requests are never retried here: retry is an
/// explicit shopper action.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with a request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL.
    /// - [`CatalogError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let base_url = Self::parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Builds a client from the catalog settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.catalog_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches and normalizes one product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnexpectedStatus`] for any non-2xx status.
    /// - [`CatalogError::Http`] on network or TLS failure.
    /// - [`CatalogError::Deserialize`] if the body is not the expected JSON.
    /// - [`CatalogError::Normalization`] if the product is structurally invalid.
    pub async fn fetch_product_by_handle(
        &self,
        handle: &Handle,
    ) -> Result<Option<Product>, CatalogError> {
        let url = self.product_url(handle)?;
        tracing::debug!(%handle, %url, "fetching product detail");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(%handle, status = status.as_u16(), "catalog returned non-success status");
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ProductDetailResponse>(&body).map_err(|e| {
            CatalogError::Deserialize {
                context: format!("product detail for {handle}"),
                source: e,
            }
        })?;

        match parsed.product {
            Some(product) => normalize_product(product).map(Some),
            None => {
                tracing::debug!(%handle, "catalog has no product for handle");
                Ok(None)
            }
        }
    }

    /// Builds the product-detail URL for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if the route cannot be joined
    /// onto the base URL.
    fn product_url(&self, handle: &Handle) -> Result<Url, CatalogError> {
        let mut url =
            self.base_url
                .join(PRODUCT_DETAIL_PATH)
                .map_err(|e| CatalogError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut().append_pair("handle", handle.as_str());
        Ok(url)
    }

    /// Parses `raw` and ensures its path ends in `/` so relative joins keep
    /// any path prefix (e.g. a storefront mounted under `/shop`).
    fn parse_base_url(raw: &str) -> Result<Url, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidBaseUrl {
            base_url: raw.to_owned(),
            reason,
        };

        let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_owned()));
        }

        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl ProductSource for CatalogClient {
    async fn fetch_product(&self, handle: &Handle) -> Result<Option<Product>, CatalogError> {
        self.fetch_product_by_handle(handle).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
