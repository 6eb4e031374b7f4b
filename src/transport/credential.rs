use std::env;
use std::fmt;

use crate::error::Error;

/// Environment variable consulted when no key is given explicitly.
pub const API_KEY_ENV: &str = "SCRAPEOPS_API_KEY";

const MISSING_KEY: &str =
    "A valid API key is required. Please check your ScrapeOps API credentials.";

/// ScrapeOps API key. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential {
    api_key: String,
}

impl ApiCredential {
    /// Wrap a key, rejecting empty values before any request is made.
    pub fn new(api_key: impl Into<String>) -> crate::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration(MISSING_KEY));
        }
        Ok(Self { api_key })
    }

    pub fn from_env() -> crate::Result<Self> {
        Self::new(env::var(API_KEY_ENV).unwrap_or_default())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let err = ApiCredential::new("  ").unwrap_err();
        assert_eq!(err.to_string(), MISSING_KEY);
        assert!(err.is_local());
    }

    #[test]
    fn test_debug_redacts_key() {
        let cred = ApiCredential::new("secret-123").unwrap();
        let rendered = format!("{:?}", cred);
        assert!(!rendered.contains("secret-123"));
        assert!(rendered.contains("redacted"));
    }
}
