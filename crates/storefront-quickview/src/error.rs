use storefront_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuickViewError {
    #[error("cannot open quick view: {0}")]
    InvalidHandle(#[from] CoreError),
}
