use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("normalization error for product {handle}: {reason}")]
    Normalization { handle: String, reason: String },

    #[error("invalid catalog URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    /// Returns `true` if asking again might succeed (network failure, 429, 5xx).
    ///
    /// Used to word the error state shown to the shopper. Nothing in this
    /// workspace retries automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Http(_) => true,
            CatalogError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            CatalogError::Deserialize { .. }
            | CatalogError::Normalization { .. }
            | CatalogError::InvalidBaseUrl { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> CatalogError {
        CatalogError::UnexpectedStatus {
            status,
            url: "https://shop.example.com/api/shopify/product?handle=tee".to_owned(),
        }
    }

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!status(400).is_retryable());
        assert!(!status(403).is_retryable());
    }

    #[test]
    fn malformed_payloads_are_not_retryable() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::Deserialize {
            context: "product tee".to_owned(),
            source,
        };
        assert!(!err.is_retryable());
        assert!(!CatalogError::Normalization {
            handle: "tee".to_owned(),
            reason: "bad".to_owned()
        }
        .is_retryable());
    }
}
