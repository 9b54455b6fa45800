pub mod client;
pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use normalize::normalize_product;
pub use source::ProductSource;
pub use types::{ProductDetailResponse, WireProduct, WireVariant};
