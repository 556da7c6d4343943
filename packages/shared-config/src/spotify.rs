//! Spotify Web API configuration types

use crate::{get_env_or_default, get_required_env, ConfigError, ConfigResult};

/// Default Spotify accounts service (token endpoint host)
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default Spotify Web API base URL
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify client-credentials configuration
#[derive(Clone)]
pub struct SpotifyConfig {
    /// Application client ID
    pub client_id: String,

    /// Application client secret
    pub client_secret: String,

    /// Accounts service base URL (token exchange)
    pub accounts_url: String,

    /// Web API base URL
    pub api_url: String,

    /// Market (ISO 3166-1 alpha-2) used for top-track lookups
    pub market: String,
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .field("market", &self.market)
            .finish()
    }
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required.
    pub fn from_env() -> ConfigResult<Self> {
        let client_id = get_required_env("SPOTIFY_CLIENT_ID")?;
        let client_secret = get_required_env("SPOTIFY_CLIENT_SECRET")?;

        if client_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SPOTIFY_CLIENT_ID".to_string(),
                "client id cannot be empty".to_string(),
            ));
        }

        if client_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SPOTIFY_CLIENT_SECRET".to_string(),
                "client secret cannot be empty".to_string(),
            ));
        }

        let market = get_env_or_default("SPOTIFY_MARKET", "IN").to_uppercase();
        if market.len() != 2 || !market.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue(
                "SPOTIFY_MARKET".to_string(),
                format!("'{}' is not a two-letter country code", market),
            ));
        }

        Ok(Self {
            client_id,
            client_secret,
            accounts_url: get_env_or_default("SPOTIFY_ACCOUNTS_URL", DEFAULT_SPOTIFY_ACCOUNTS_URL),
            api_url: get_env_or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            market,
        })
    }

    /// Create a configuration with explicit credentials and default endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            market: "IN".to_string(),
        }
    }

    /// Point both endpoints at a single base URL (mock servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base = base_url.trim_end_matches('/');
        self.accounts_url = base.to_string();
        self.api_url = format!("{}/v1", base);
        self
    }

    /// Full URL of the client-credentials token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }
}
