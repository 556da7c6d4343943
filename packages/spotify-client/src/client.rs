//! Spotify Web API client implementation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use tunebridge_shared_config::SpotifyConfig;

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{
    Artist, ArtistSearchResponse, ArtistsResponse, ErrorEnvelope, Track, TrackSearchResponse,
    TracksResponse,
};
use crate::token::TokenCache;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Largest page size the search endpoint accepts
const MAX_SEARCH_LIMIT: u32 = 50;

/// Most IDs the several-tracks endpoint accepts in one call
pub const MAX_TRACK_IDS: usize = 50;

/// Spotify Web API client
///
/// Cheap to clone: clones share the HTTP connection pool and the token cache.
#[derive(Clone)]
pub struct SpotifyClient {
    http_client: Client,
    api_url: String,
    market: String,
    tokens: Arc<TokenCache>,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.api_url)
            .field("market", &self.market)
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl SpotifyClient {
    /// Create a new Spotify client
    ///
    /// # Errors
    /// Returns `SpotifyError::MissingCredentials` if the id or secret is empty
    pub fn new(config: SpotifyConfig) -> SpotifyResult<Self> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(SpotifyError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Tunebridge/1.0")
            .build()?;

        let tokens = TokenCache::new(
            http_client.clone(),
            config.token_url(),
            config.client_id,
            config.client_secret,
        );

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            market: config.market,
            tokens: Arc::new(tokens),
        })
    }

    /// Current bearer token (fetched or refreshed on demand)
    pub async fn access_token(&self) -> SpotifyResult<String> {
        self.tokens.token().await
    }

    fn validate_non_empty<'a>(value: &'a str, what: &str) -> SpotifyResult<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SpotifyError::InvalidInput(format!("{} cannot be empty", what)));
        }
        Ok(trimmed)
    }

    /// Authenticated GET against the Web API, decoded as `T`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> SpotifyResult<T> {
        let token = self.tokens.token().await?;

        let response = self
            .http_client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(SpotifyError::from_transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), path, body = %text, "Spotify API request failed");
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Search the catalog for tracks
    ///
    /// Only items Spotify declares as `"track"` are returned.
    #[instrument(skip(self))]
    pub async fn search_tracks(&self, query: &str, limit: u32) -> SpotifyResult<Vec<Track>> {
        let query = Self::validate_non_empty(query, "search query")?;
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();

        let response: TrackSearchResponse = self
            .get_json(
                "/search",
                &[("q", query), ("type", "track"), ("limit", &limit)],
            )
            .await?;

        let tracks: Vec<Track> = response
            .tracks
            .items
            .into_iter()
            .filter(Track::is_track)
            .collect();

        debug!(query = %query, result_count = tracks.len(), "Track search completed");
        Ok(tracks)
    }

    /// Search the catalog for artists, best match first
    #[instrument(skip(self))]
    pub async fn search_artists(&self, query: &str, limit: u32) -> SpotifyResult<Vec<Artist>> {
        let query = Self::validate_non_empty(query, "search query")?;
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();

        let response: ArtistSearchResponse = self
            .get_json(
                "/search",
                &[("q", query), ("type", "artist"), ("limit", &limit)],
            )
            .await?;

        debug!(query = %query, result_count = response.artists.items.len(), "Artist search completed");
        Ok(response.artists.items)
    }

    /// Best catalog match for an artist name, if any
    pub async fn find_artist(&self, name: &str) -> SpotifyResult<Option<Artist>> {
        Ok(self.search_artists(name, 1).await?.into_iter().next())
    }

    /// Artists tagged with a genre, via the `genre:"..."` search filter
    #[instrument(skip(self))]
    pub async fn search_artists_by_genre(
        &self,
        genre: &str,
        limit: u32,
    ) -> SpotifyResult<Vec<Artist>> {
        let genre = Self::validate_non_empty(genre, "genre")?;
        self.search_artists(&format!("genre:\"{}\"", genre.replace('"', "")), limit)
            .await
    }

    /// Top tracks of an artist in the configured market
    #[instrument(skip(self))]
    pub async fn artist_top_tracks(&self, artist_id: &str) -> SpotifyResult<Vec<Track>> {
        let artist_id = Self::validate_non_empty(artist_id, "artist id")?;
        let path = format!("/artists/{}/top-tracks", artist_id);

        let response: TracksResponse = self
            .get_json(&path, &[("market", self.market.as_str())])
            .await?;

        Ok(response.tracks.into_iter().flatten().collect())
    }

    /// Artists Spotify considers related to the given artist
    #[instrument(skip(self))]
    pub async fn related_artists(&self, artist_id: &str) -> SpotifyResult<Vec<Artist>> {
        let artist_id = Self::validate_non_empty(artist_id, "artist id")?;
        let path = format!("/artists/{}/related-artists", artist_id);

        let response: ArtistsResponse = self.get_json(&path, &[]).await?;
        Ok(response.artists)
    }

    /// Fetch several tracks by ID
    ///
    /// IDs Spotify does not know come back as `null` and are dropped.
    ///
    /// # Errors
    /// `SpotifyError::InvalidInput` for an empty list or more than
    /// [`MAX_TRACK_IDS`] IDs; no request is made in that case.
    #[instrument(skip(self))]
    pub async fn tracks(&self, ids: &[String]) -> SpotifyResult<Vec<Track>> {
        if ids.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "at least one track id is required".to_string(),
            ));
        }
        if ids.len() > MAX_TRACK_IDS {
            return Err(SpotifyError::InvalidInput(format!(
                "at most {} track ids are allowed (got {})",
                MAX_TRACK_IDS,
                ids.len()
            )));
        }

        let joined = ids.join(",");
        let response: TracksResponse = self.get_json("/tracks", &[("ids", &joined)]).await?;
        Ok(response.tracks.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_with_token(server: &MockServer) -> SpotifyClient {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(server)
            .await;

        SpotifyClient::new(SpotifyConfig::new("id", "secret").with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_client_requires_credentials() {
        let result = SpotifyClient::new(SpotifyConfig::new("", "secret"));
        assert_matches!(result, Err(SpotifyError::MissingCredentials));
    }

    #[test]
    fn test_client_debug_redacts_secret() {
        let client = SpotifyClient::new(SpotifyConfig::new("id", "topsecret")).unwrap();
        assert!(!format!("{:?}", client).contains("topsecret"));
    }

    #[tokio::test]
    async fn test_search_tracks_filters_non_tracks() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "kesariya"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "10"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [
                    {"id": "t1", "name": "Kesariya", "type": "track"},
                    {"id": "e1", "name": "Kesariya Talk", "type": "episode"}
                ]}
            })))
            .mount(&server)
            .await;

        let tracks = client.search_tracks("kesariya", 10).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query_without_request() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        let err = client.search_tracks("   ", 10).await.unwrap_err();
        assert_matches!(err, SpotifyError::InvalidInput(_));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_artist_takes_first_match() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "artist"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {"items": [{"id": "a1", "name": "Arijit Singh", "images": []}]}
            })))
            .mount(&server)
            .await;

        let artist = client.find_artist("Arijit Singh").await.unwrap().unwrap();
        assert_eq!(artist.id, "a1");
    }

    #[tokio::test]
    async fn test_genre_search_uses_filter_syntax() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "genre:\"filmi\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {"items": [{"id": "a1", "name": "Lata Mangeshkar"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let artists = client.search_artists_by_genre(" filmi ", 5).await.unwrap();
        assert_eq!(artists[0].name, "Lata Mangeshkar");
    }

    #[tokio::test]
    async fn test_top_tracks_use_market() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/artists/a1/top-tracks"))
            .and(query_param("market", "IN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [{"id": "t1", "name": "Tum Hi Ho", "type": "track"}]
            })))
            .mount(&server)
            .await;

        let tracks = client.artist_top_tracks("a1").await.unwrap();
        assert_eq!(tracks[0].name, "Tum Hi Ho");
    }

    #[tokio::test]
    async fn test_tracks_drops_unknown_ids() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/tracks"))
            .and(query_param("ids", "t1,missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [{"id": "t1", "name": "Song", "type": "track"}, null]
            })))
            .mount(&server)
            .await;

        let tracks = client
            .tracks(&["t1".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_tracks_rejects_too_many_ids_without_request() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        let ids: Vec<String> = (0..=MAX_TRACK_IDS).map(|i| format!("t{}", i)).collect();
        let err = client.tracks(&ids).await.unwrap_err();

        assert_matches!(err, SpotifyError::InvalidInput(_));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_extracts_message() {
        let server = MockServer::start().await;
        let client = client_with_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/artists/bad/related-artists"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"status": 404, "message": "non existing id"}
            })))
            .mount(&server)
            .await;

        let err = client.related_artists("bad").await.unwrap_err();
        assert_matches!(err, SpotifyError::Api { status: 404, message } if message == "non existing id");
    }
}
