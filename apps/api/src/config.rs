//! API server configuration

use std::env;

use anyhow::{bail, Context, Result};
use tunebridge_shared_config::{
    parse_env, CommonConfig, DatabaseConfig, Environment, SpotifyConfig, TasteDiveConfig,
};

use crate::services::discovery::{DiscoveryConfig, SimilaritySource};

/// Minimum required length for SESSION_SECRET to be considered secure
const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Default session cookie name
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "tunebridge.sid";

/// Secret used outside production when SESSION_SECRET is unset
const DEVELOPMENT_SESSION_SECRET: &str = "development-session-secret-change-me";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 3000)
    pub port: u16,

    /// HMAC key for signing session cookies
    pub session_secret: String,

    /// Session cookie name (default: tunebridge.sid)
    pub session_cookie_name: String,

    /// Session lifetime as a duration string (default: 1d)
    pub session_ttl: String,

    /// Similarity source and aggregation limits
    pub discovery: DiscoveryConfig,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `SESSION_SECRET`: Must be set and at least 32 characters long
    /// - `DATABASE_URL`: Must be explicitly set (no insecure defaults)
    ///
    /// `TASTEDIVE_API_KEY` is required whenever `SIMILARITY_SOURCE` is `tastedive`.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();
        let is_production = environment.is_production();

        let session_secret = Self::load_session_secret(is_production)?;

        if is_production {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let discovery = Self::load_discovery_config()?;
        if discovery.similarity_source == SimilaritySource::TasteDive && !common.has_tastedive() {
            bail!(
                "TASTEDIVE_API_KEY environment variable is required when SIMILARITY_SOURCE=tastedive. \
                 Set the key or switch to SIMILARITY_SOURCE=spotify."
            );
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT value")?,

            session_secret,

            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),

            session_ttl: env::var("SESSION_TTL").unwrap_or_else(|_| "1d".to_string()),

            discovery,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Load and validate SESSION_SECRET
    ///
    /// In production:
    /// - SESSION_SECRET must be explicitly set
    /// - Must be at least MIN_SESSION_SECRET_LENGTH characters
    ///
    /// In development: uses a default value with a warning
    fn load_session_secret(is_production: bool) -> Result<String> {
        match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_SESSION_SECRET_LENGTH {
                    bail!(
                        "SESSION_SECRET must be at least {} characters in production (got {})",
                        MIN_SESSION_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "SESSION_SECRET environment variable is required in production. \
                     Please set a secure secret of at least {} characters.",
                    MIN_SESSION_SECRET_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "SESSION_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok(DEVELOPMENT_SESSION_SECRET.to_string())
            }
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Load the similarity source and aggregation limits
    fn load_discovery_config() -> Result<DiscoveryConfig> {
        let defaults = DiscoveryConfig::default();

        let similarity_source: SimilaritySource = env::var("SIMILARITY_SOURCE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<SimilaritySource>())
            .transpose()
            .map_err(|e: String| anyhow::anyhow!(e))?
            .unwrap_or_default();

        let fanout: usize = parse_env("DISCOVERY_FANOUT", defaults.fanout)?;
        if fanout == 0 {
            bail!("DISCOVERY_FANOUT must be at least 1");
        }

        Ok(DiscoveryConfig {
            similarity_source,
            max_candidates: parse_env("DISCOVERY_MAX_CANDIDATES", defaults.max_candidates)?,
            similar_per_seed: parse_env("DISCOVERY_SIMILAR_PER_SEED", defaults.similar_per_seed)?,
            max_tracks: parse_env("DISCOVERY_MAX_TRACKS", defaults.max_tracks)?,
            genre_seed_limit: parse_env("DISCOVERY_GENRE_SEEDS", defaults.genre_seed_limit)?,
            fanout,
        })
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get Spotify configuration
    pub fn spotify(&self) -> &SpotifyConfig {
        &self.common.spotify
    }

    /// Get TasteDive configuration (if configured)
    pub fn tastedive(&self) -> Option<&TasteDiveConfig> {
        self.common.tastedive.as_ref()
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
