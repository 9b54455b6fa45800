use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Stable, human-readable product identifier used as the catalog fetch key
/// (e.g. `"classic-tee"`).
///
/// Only RFC 3986 unreserved characters are accepted so a handle can be placed
/// in a query string or path segment without further escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Validates and wraps a raw handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHandle`] when `raw` is empty or contains a
    /// character outside `A-Z a-z 0-9 - . _ ~`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::InvalidHandle {
                handle: raw.to_owned(),
                reason: "handle is empty".into(),
            });
        }

        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
        {
            return Err(CoreError::InvalidHandle {
                handle: raw.to_owned(),
                reason: format!("character {bad:?} is not URL-safe"),
            });
        }

        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}
