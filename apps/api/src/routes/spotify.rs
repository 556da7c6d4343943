//! Spotify proxy and aggregation route handlers
//!
//! Mounted under `/api/spotify`:
//! - `GET /search?q=` - Track search
//! - `GET /recommendations?artists=|genres=` - Top tracks of seeds and similar artists
//! - `GET /artists?artists=|genres=` - Seeds and similar artists, partitioned
//! - `GET /artist-tracks/:artistId` - Top tracks of one artist
//! - `GET /artist-image?artistName=` - Image of the best-matching artist
//! - `GET /tracks?ids=` - Several tracks by ID

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::services::{CatalogService, DiscoveryService, SeedQuery};

/// Shared state for Spotify handlers
#[derive(Clone)]
pub struct SpotifyState {
    pub catalog: Arc<CatalogService>,
    pub discovery: Arc<DiscoveryService>,
}

impl SpotifyState {
    pub fn new(catalog: CatalogService, discovery: DiscoveryService) -> Self {
        Self {
            catalog: Arc::new(catalog),
            discovery: Arc::new(discovery),
        }
    }
}

/// Create the Spotify router
pub fn spotify_router(state: SpotifyState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/recommendations", get(recommendations))
        .route("/artists", get(artists))
        .route("/artist-tracks/:artistId", get(artist_tracks))
        .route("/artist-image", get(artist_image))
        .route("/tracks", get(tracks))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Comma-separated seeds; `artists` wins over `genres`
#[derive(Debug, Deserialize)]
pub struct SeedParams {
    pub artists: Option<String>,
    pub genres: Option<String>,
}

impl SeedParams {
    fn seed_query(&self) -> ApiResult<SeedQuery> {
        SeedQuery::from_params(self.artists.as_deref(), self.genres.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtistImageParams {
    #[serde(rename = "artistName")]
    pub artist_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackIdsParams {
    pub ids: Option<String>,
}

async fn search(
    State(state): State<SpotifyState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<impl IntoResponse> {
    let tracks = state.catalog.search_tracks(params.q.as_deref()).await?;
    Ok(Json(tracks))
}

async fn recommendations(
    State(state): State<SpotifyState>,
    Query(params): Query<SeedParams>,
) -> ApiResult<impl IntoResponse> {
    let recommendations = state.discovery.recommend(params.seed_query()?).await?;
    Ok(Json(recommendations))
}

async fn artists(
    State(state): State<SpotifyState>,
    Query(params): Query<SeedParams>,
) -> ApiResult<impl IntoResponse> {
    let partition = state.discovery.resolve_artists(params.seed_query()?).await?;
    Ok(Json(partition))
}

async fn artist_tracks(
    State(state): State<SpotifyState>,
    Path(artist_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tracks = state.catalog.artist_top_tracks(&artist_id).await?;
    Ok(Json(tracks))
}

async fn artist_image(
    State(state): State<SpotifyState>,
    Query(params): Query<ArtistImageParams>,
) -> ApiResult<impl IntoResponse> {
    let image = state
        .catalog
        .artist_image(params.artist_name.as_deref())
        .await?;
    Ok(Json(image))
}

async fn tracks(
    State(state): State<SpotifyState>,
    Query(params): Query<TrackIdsParams>,
) -> ApiResult<impl IntoResponse> {
    let tracks = state.catalog.tracks_by_ids(params.ids.as_deref()).await?;
    Ok(Json(tracks))
}
