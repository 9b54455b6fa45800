//! The single contract the quick view needs from the catalog.

use std::future::Future;

use storefront_core::{Handle, Product};

use crate::error::CatalogError;

/// Fetches product detail by handle.
///
/// `Ok(None)` means the catalog answered and the handle maps to nothing.
/// Transport and format failures are `Err`. Implementations must not retry
/// on their own.
pub trait ProductSource: Send + Sync + 'static {
    fn fetch_product(
        &self,
        handle: &Handle,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send;
}
