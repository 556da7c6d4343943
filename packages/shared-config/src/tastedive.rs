//! TasteDive similarity service configuration

use crate::{get_env_or_default, get_required_env, ConfigError, ConfigResult};

/// Default TasteDive API base URL
pub const DEFAULT_TASTEDIVE_API_URL: &str = "https://tastedive.com/api";

/// TasteDive configuration
#[derive(Clone)]
pub struct TasteDiveConfig {
    /// TasteDive API base URL
    pub url: String,

    /// TasteDive API key (`k` query parameter)
    pub api_key: String,
}

impl std::fmt::Debug for TasteDiveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasteDiveConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl TasteDiveConfig {
    /// Load TasteDive configuration from environment variables
    ///
    /// Returns an error if `TASTEDIVE_API_KEY` is not set, so callers that
    /// treat TasteDive as optional can use `.ok()`.
    pub fn from_env() -> ConfigResult<Self> {
        let api_key = get_required_env("TASTEDIVE_API_KEY")?;

        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "TASTEDIVE_API_KEY".to_string(),
                "API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            url: get_env_or_default("TASTEDIVE_API_URL", DEFAULT_TASTEDIVE_API_URL),
            api_key,
        })
    }

    /// Create a configuration with custom URL and API key (useful for testing)
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the `similar` endpoint
    pub fn similar_url(&self) -> String {
        format!("{}/similar", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_url() {
        let config = TasteDiveConfig::new("https://tastedive.com/api/", "key");
        assert_eq!(config.similar_url(), "https://tastedive.com/api/similar");
    }

    #[test]
    fn test_from_env_missing_key() {
        temp_env::with_var_unset("TASTEDIVE_API_KEY", || {
            assert!(TasteDiveConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_from_env_defaults_url() {
        temp_env::with_vars(
            [
                ("TASTEDIVE_API_KEY", Some("abc")),
                ("TASTEDIVE_API_URL", None),
            ],
            || {
                let config = TasteDiveConfig::from_env().unwrap();
                assert_eq!(config.url, DEFAULT_TASTEDIVE_API_URL);
                assert_eq!(config.api_key, "abc");
            },
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = TasteDiveConfig::new(DEFAULT_TASTEDIVE_API_URL, "hidden-key");
        assert!(!format!("{:?}", config).contains("hidden-key"));
    }
}
