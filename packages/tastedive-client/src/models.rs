//! TasteDive API response models

use serde::{Deserialize, Serialize};

/// A music result TasteDive considers similar to the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarArtist {
    /// Artist name as TasteDive spells it
    pub name: String,
    /// Result type reported by TasteDive ("music" for artists)
    pub kind: Option<String>,
}

// Internal response types for deserialization.
//
// TasteDive has served both lowercase (`similar.results[].name`) and
// capitalised (`Similar.Results[].Name`) payloads; aliases accept either.

#[derive(Debug, Deserialize)]
pub(crate) struct SimilarResponse {
    #[serde(default, alias = "Similar")]
    pub similar: Option<SimilarWrapper>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SimilarWrapper {
    #[serde(default, alias = "Results")]
    pub results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawResult {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "type", alias = "Type")]
    pub kind: Option<String>,
}

impl RawResult {
    /// Convert into a public model, dropping results without a usable name
    pub(crate) fn into_artist(self) -> Option<SimilarArtist> {
        let name = self.name?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        Some(SimilarArtist {
            name,
            kind: self.kind,
        })
    }
}

/// TasteDive error payload
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(alias = "Error")]
    pub error: String,
}
