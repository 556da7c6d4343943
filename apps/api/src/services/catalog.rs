//! Direct Spotify catalog lookups
//!
//! Thin wrappers over the Spotify client that validate request input and
//! attach the public error message for each route.

use serde::Serialize;
use tracing::instrument;
use tunebridge_spotify_client::{SpotifyClient, Track, MAX_TRACK_IDS};

use crate::error::{ApiError, ApiResult, UpstreamContext};

/// Results returned by the search proxy
const SEARCH_LIMIT: u32 = 10;

/// Image lookup result; `image` is null when the artist is unknown or has none
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistImage {
    pub image: Option<String>,
}

/// Tracks fetched by ID
#[derive(Debug, Clone, Serialize)]
pub struct TrackList {
    pub tracks: Vec<Track>,
}

/// Catalog lookup service
#[derive(Clone)]
pub struct CatalogService {
    spotify: SpotifyClient,
}

impl CatalogService {
    pub fn new(spotify: SpotifyClient) -> Self {
        Self { spotify }
    }

    /// Free-text track search
    #[instrument(skip(self))]
    pub async fn search_tracks(&self, query: Option<&str>) -> ApiResult<Vec<Track>> {
        let query = required(query, "Missing query")?;
        self.spotify
            .search_tracks(query, SEARCH_LIMIT)
            .await
            .upstream_context("Spotify search failed")
    }

    /// Top tracks of one artist
    #[instrument(skip(self))]
    pub async fn artist_top_tracks(&self, artist_id: &str) -> ApiResult<Vec<Track>> {
        let artist_id = required(Some(artist_id), "Artist ID required")?;
        self.spotify
            .artist_top_tracks(artist_id)
            .await
            .upstream_context("Failed to fetch artist's tracks")
    }

    /// Image URL of the best catalog match for an artist name
    #[instrument(skip(self))]
    pub async fn artist_image(&self, artist_name: Option<&str>) -> ApiResult<ArtistImage> {
        let artist_name = required(artist_name, "Artist name required")?;
        let artist = self
            .spotify
            .find_artist(artist_name)
            .await
            .upstream_context("Failed to fetch artist image")?;

        Ok(ArtistImage {
            image: artist.and_then(|a| a.image_url().map(str::to_string)),
        })
    }

    /// Tracks for a comma-separated ID list
    ///
    /// More than [`MAX_TRACK_IDS`] IDs is rejected before any upstream call.
    #[instrument(skip(self))]
    pub async fn tracks_by_ids(&self, ids: Option<&str>) -> ApiResult<TrackList> {
        let ids = parse_track_ids(ids.unwrap_or_default());
        if ids.is_empty() {
            return Err(ApiError::ValidationError("Track IDs required".to_string()));
        }
        if ids.len() > MAX_TRACK_IDS {
            return Err(ApiError::ValidationError(format!(
                "At most {} track IDs per request",
                MAX_TRACK_IDS
            )));
        }

        let tracks = self
            .spotify
            .tracks(&ids)
            .await
            .upstream_context("Failed to fetch tracks")?;
        Ok(TrackList { tracks })
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> ApiResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::ValidationError(message.to_string()))
}

/// Split on commas, trim, drop blanks
fn parse_track_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use tunebridge_test_utils::{artist_json, track_json, MockSpotifyServer};

    async fn catalog(server: &MockSpotifyServer) -> CatalogService {
        CatalogService::new(SpotifyClient::new(server.config()).unwrap())
    }

    #[test]
    fn test_parse_track_ids() {
        assert_eq!(parse_track_ids(" a, ,b ,,c"), vec!["a", "b", "c"]);
        assert!(parse_track_ids("").is_empty());
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let server = MockSpotifyServer::start_authenticated().await;
        let catalog = catalog(&server).await;

        assert_matches!(
            catalog.search_tracks(None).await,
            Err(ApiError::ValidationError(message)) if message == "Missing query"
        );
        assert_matches!(
            catalog.search_tracks(Some("   ")).await,
            Err(ApiError::ValidationError(_))
        );
        assert_eq!(server.api_request_count().await, 0);
    }

    #[tokio::test]
    async fn test_search_filters_non_tracks() {
        let server = MockSpotifyServer::start_authenticated().await;
        server
            .mock_track_search(
                "tum hi ho",
                vec![
                    track_json("t1", "Tum Hi Ho", "a"),
                    json!({"id": "e1", "name": "Episode", "type": "episode"}),
                ],
            )
            .await;

        let tracks = catalog(&server)
            .await
            .search_tracks(Some("tum hi ho"))
            .await
            .unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(tracks.iter().all(Track::is_track));
    }

    #[tokio::test]
    async fn test_search_upstream_failure_is_generic() {
        let server = MockSpotifyServer::start_authenticated().await;
        server.mock_api_failure(502).await;

        let err = catalog(&server)
            .await
            .search_tracks(Some("anything"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Spotify search failed");
    }

    #[tokio::test]
    async fn test_artist_image() {
        let server = MockSpotifyServer::start_authenticated().await;
        server
            .mock_artist_search("Shreya Ghoshal", Some(artist_json("sg", "Shreya Ghoshal")))
            .await;
        server.mock_artist_search_miss().await;
        let catalog = catalog(&server).await;

        let found = catalog.artist_image(Some("Shreya Ghoshal")).await.unwrap();
        assert_eq!(found.image.as_deref(), Some("https://i.scdn.co/image/sg"));

        let missing = catalog.artist_image(Some("Nobody")).await.unwrap();
        assert_eq!(missing, ArtistImage { image: None });

        assert_matches!(
            catalog.artist_image(None).await,
            Err(ApiError::ValidationError(message)) if message == "Artist name required"
        );
    }

    #[tokio::test]
    async fn test_tracks_by_ids_limits() {
        let server = MockSpotifyServer::start_authenticated().await;
        let catalog = catalog(&server).await;

        let too_many: Vec<String> = (0..51).map(|i| format!("id{}", i)).collect();
        assert_matches!(
            catalog.tracks_by_ids(Some(&too_many.join(","))).await,
            Err(ApiError::ValidationError(_))
        );
        assert_matches!(
            catalog.tracks_by_ids(Some(" , ")).await,
            Err(ApiError::ValidationError(message)) if message == "Track IDs required"
        );
        assert_eq!(server.api_request_count().await, 0);
    }

    #[tokio::test]
    async fn test_tracks_by_ids_drops_nulls() {
        let server = MockSpotifyServer::start_authenticated().await;
        server
            .mock_tracks("t1,missing", vec![track_json("t1", "One", "a"), json!(null)])
            .await;

        let list = catalog(&server)
            .await
            .tracks_by_ids(Some(" t1 , missing ,"))
            .await
            .unwrap();
        assert_eq!(list.tracks.len(), 1);
    }
}
