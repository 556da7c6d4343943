//! Spotify API response models
//!
//! Artist and track objects are passed through to Tunebridge callers, so the
//! fields the aggregation logic needs are typed and everything else is kept
//! verbatim in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Image attached to an artist or album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Full artist object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Artist {
    /// URL of the first (largest) image, if any
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// Simplified artist reference embedded in tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full track object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Spotify ID (absent for local files)
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// Object type as declared by Spotify ("track" for tracks)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Name of the resolved artist this track was gathered for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_artist: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    /// Whether Spotify declared this object a track
    pub fn is_track(&self) -> bool {
        self.kind.as_deref() == Some("track")
    }

    /// Tag the track with the artist it was gathered for
    pub fn with_source_artist(mut self, artist_name: impl Into<String>) -> Self {
        self.source_artist = Some(artist_name.into());
        self
    }
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackSearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistSearchResponse {
    pub artists: Paging<Artist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracksResponse {
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Spotify Web API error envelope: `{"error": {"status": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
