//! TasteDive API client implementation

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use tunebridge_shared_config::TasteDiveConfig;

use crate::error::{TasteDiveError, TasteDiveResult};
use crate::models::{ErrorResponse, SimilarArtist, SimilarResponse};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of similar results to request
const DEFAULT_SIMILAR_LIMIT: u32 = 10;

/// Maximum query length accepted before calling TasteDive
const MAX_QUERY_LENGTH: usize = 256;

/// Options for a `similar` lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarQuery {
    /// Maximum number of results
    pub limit: u32,
    /// Ask TasteDive to include descriptive info (`info=1`)
    pub verbose: bool,
}

impl Default for SimilarQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SIMILAR_LIMIT,
            verbose: false,
        }
    }
}

/// TasteDive API client
#[derive(Clone)]
pub struct TasteDiveClient {
    http_client: Client,
    similar_url: String,
    api_key: String,
}

impl fmt::Debug for TasteDiveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TasteDiveClient")
            .field("similar_url", &self.similar_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl TasteDiveClient {
    /// Create a new TasteDive client
    ///
    /// # Errors
    /// Returns `TasteDiveError::MissingApiKey` if the API key is empty
    pub fn new(config: TasteDiveConfig) -> TasteDiveResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TasteDiveError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .user_agent("Tunebridge/1.0")
            .build()?;

        Ok(Self {
            http_client,
            similar_url: config.similar_url(),
            api_key: config.api_key,
        })
    }

    /// Validate a query string
    fn validate_query(query: &str) -> TasteDiveResult<&str> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(TasteDiveError::InvalidInput(
                "query cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_QUERY_LENGTH {
            return Err(TasteDiveError::InvalidInput(format!(
                "query too long (max {} characters)",
                MAX_QUERY_LENGTH
            )));
        }
        Ok(trimmed)
    }

    /// Get music similar to the given artist name
    ///
    /// Results without a name are skipped. An unknown artist is not an error:
    /// TasteDive answers with an empty result list.
    ///
    /// # Errors
    /// - `TasteDiveError::InvalidInput` - If the name is empty or too long
    /// - `TasteDiveError::Api` - If TasteDive answers with an error status or payload
    /// - `TasteDiveError::Http` / `Timeout` - If the request fails
    #[instrument(skip(self))]
    pub async fn get_similar_artists(
        &self,
        artist_name: &str,
        query: SimilarQuery,
    ) -> TasteDiveResult<Vec<SimilarArtist>> {
        let artist_name = Self::validate_query(artist_name)?;
        let limit = query.limit.to_string();
        let info = if query.verbose { "1" } else { "0" };

        debug!(artist = %artist_name, limit = query.limit, "Fetching similar artists from TasteDive");

        let response = self
            .http_client
            .get(&self.similar_url)
            .query(&[
                ("q", artist_name),
                ("type", "music"),
                ("info", info),
                ("limit", limit.as_str()),
                ("k", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TasteDiveError::Timeout
                } else {
                    TasteDiveError::Http(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "TasteDive returned an error status");
            return Err(TasteDiveError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&text) {
            return Err(TasteDiveError::Api {
                status: status.as_u16(),
                message: error.error,
            });
        }

        let parsed: SimilarResponse = serde_json::from_str(&text)?;
        let artists: Vec<SimilarArtist> = parsed
            .similar
            .unwrap_or_default()
            .results
            .into_iter()
            .filter_map(|raw| raw.into_artist())
            .collect();

        debug!(
            artist = %artist_name,
            result_count = artists.len(),
            "Found similar artists"
        );

        Ok(artists)
    }
}
