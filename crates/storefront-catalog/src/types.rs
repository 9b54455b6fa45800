//! Wire types for the storefront's product-detail route
//! (`GET /api/shopify/product?handle=...`).
//!
//! The route proxies the Storefront API `product(handle:)` query and wraps the
//! result as `{"product": ...}`.
//!
//! ### Not found
//! An unknown handle is a `200` with `"product": null`. It is not an HTTP
//! error and must stay distinguishable from one.
//!
//! ### Connections
//! `images` and `variants` arrive as GraphQL connections (`{"nodes": [...]}`).
//! `images` may be absent on stripped-down fixtures, so it defaults to empty.
//!
//! ### Money
//! `amount` is a decimal string (`"29.0"`, `"162.00"`), never a JSON number.
//! `compareAtPrice` is explicitly `null` when the variant is not on sale.
//!
//! ### Degenerate options
//! Products without real variants still declare one option,
//! `{"name": "Title", "values": ["Default Title"]}`, and a single variant
//! carrying it.

use serde::Deserialize;

/// Envelope returned by the product-detail route.
#[derive(Debug, Deserialize)]
pub struct ProductDetailResponse {
    #[serde(default)]
    pub product: Option<WireProduct>,
}

/// A GraphQL connection flattened to its `nodes`.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    /// Storefront GID, e.g. `"gid://shopify/Product/7982853619955"`.
    pub id: String,
    pub handle: String,
    pub title: String,
    /// Plain-text description. May be `null` on drafts.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured_image: Option<WireImage>,
    #[serde(default)]
    pub images: Connection<WireImage>,
    #[serde(default)]
    pub options: Vec<WireOption>,
    pub variants: Connection<WireVariant>,
    pub price_range: WirePriceRange,
}

#[derive(Debug, Deserialize)]
pub struct WireOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariant {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<WireSelectedOption>,
    pub price: WireMoney,
    #[serde(default)]
    pub compare_at_price: Option<WireMoney>,
    #[serde(default)]
    pub image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
pub struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePriceRange {
    pub min_variant_price: WireMoney,
    pub max_variant_price: WireMoney,
}
