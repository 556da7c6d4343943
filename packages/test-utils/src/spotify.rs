//! Mock Spotify Web API for testing catalog lookups and aggregation
//!
//! Provides a [`MockSpotifyServer`] serving both the accounts token endpoint
//! (`/api/token`) and the Web API (`/v1/...`) from one [`wiremock::MockServer`].

use serde_json::{json, Value};
use tunebridge_shared_config::SpotifyConfig;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token handed out by [`MockSpotifyServer::mock_token`]
pub const MOCK_ACCESS_TOKEN: &str = "mock-spotify-token";

/// Priority for catch-all mocks so specific ones win (lower = higher priority)
const FALLBACK_PRIORITY: u8 = 10;

/// Build a minimal Spotify artist object
pub fn artist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "artist",
        "genres": [],
        "popularity": 50,
        "images": [
            {"url": format!("https://i.scdn.co/image/{}", id), "height": 640, "width": 640}
        ],
        "external_urls": {"spotify": format!("https://open.spotify.com/artist/{}", id)}
    })
}

/// Build a minimal Spotify track object credited to one artist
pub fn track_json(id: &str, name: &str, artist_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "track",
        "duration_ms": 240000,
        "artists": [{"id": artist_id, "name": artist_id, "type": "artist"}],
        "album": {"id": format!("album-{}", id), "name": "Album"}
    })
}

/// Mock Spotify server
pub struct MockSpotifyServer {
    server: MockServer,
}

impl MockSpotifyServer {
    /// Start a new mock server with no mocks mounted
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Start a mock server that already answers token exchanges
    pub async fn start_authenticated() -> Self {
        let server = Self::start().await;
        server.mock_token(3600).await;
        server
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Spotify configuration pointing at this server
    pub fn config(&self) -> SpotifyConfig {
        SpotifyConfig::new("mock-client-id", "mock-client-secret").with_base_url(self.url())
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mount a successful client-credentials exchange
    pub async fn mock_token(&self, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": MOCK_ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": expires_in
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a rejected client-credentials exchange
    pub async fn mock_token_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a track search for an exact query
    pub async fn mock_track_search(&self, query: &str, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "track"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": items}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an artist search for an exact query, answering with at most one match
    pub async fn mock_artist_search(&self, query: &str, artist: Option<Value>) {
        let items: Vec<Value> = artist.into_iter().collect();
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "artist"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {"items": items}
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer every otherwise unmatched artist search with no results
    pub async fn mock_artist_search_miss(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "artist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {"items": []}
            })))
            .with_priority(FALLBACK_PRIORITY)
            .mount(&self.server)
            .await;
    }

    /// Mount a genre-filtered artist search
    pub async fn mock_genre_search(&self, genre: &str, artists: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "artist"))
            .and(query_param("q", format!("genre:\"{}\"", genre)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {"items": artists}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount top tracks for an artist
    pub async fn mock_top_tracks(&self, artist_id: &str, tracks: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/artists/{}/top-tracks", artist_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": tracks
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount related artists for an artist
    pub async fn mock_related_artists(&self, artist_id: &str, artists: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/artists/{}/related-artists", artist_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": artists
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the several-tracks endpoint for an exact comma-joined id list
    pub async fn mock_tracks(&self, ids: &str, tracks: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/tracks"))
            .and(query_param("ids", ids))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": tracks
            })))
            .mount(&self.server)
            .await;
    }

    /// Make every Web API call fail with the given status
    pub async fn mock_api_failure(&self, status_code: u16) {
        Mock::given(path_regex("^/v1/.*"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"status": status_code, "message": "upstream exploded"}
            })))
            .with_priority(FALLBACK_PRIORITY)
            .mount(&self.server)
            .await;
    }

    /// Number of requests received whose path equals `request_path`
    pub async fn request_count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }

    /// Number of search requests of the given `type` (e.g. "artist")
    pub async fn search_count(&self, kind: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/v1/search")
            .filter(|request| {
                request
                    .url
                    .query_pairs()
                    .any(|(key, value)| key == "type" && value == kind)
            })
            .count()
    }

    /// Total requests to the Web API (token exchanges excluded)
    pub async fn api_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().starts_with("/v1/"))
            .count()
    }
}
