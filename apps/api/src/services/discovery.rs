//! Artist discovery and recommendation aggregation
//!
//! Seed artist names are expanded through a similarity source (TasteDive or
//! Spotify's related-artists), merged into a deduplicated candidate set,
//! resolved against the Spotify catalog, and then either partitioned into
//! seed/similar artists or turned into a flat list of top tracks.
//!
//! Every external call goes through an order-preserving bounded fan-out.
//! With the default width of 1 calls are issued strictly one after another.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};
use tunebridge_spotify_client::{Artist, SpotifyClient, Track};
use tunebridge_tastedive_client::{SimilarQuery, TasteDiveClient};

use crate::error::{ApiError, ApiResult, UpstreamContext};

const ARTISTS_CONTEXT: &str = "Failed to fetch artists by preference";
const RECOMMENDATIONS_CONTEXT: &str = "Failed to fetch recommendations";

/// Where related artist names come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilaritySource {
    #[default]
    TasteDive,
    Spotify,
}

impl FromStr for SimilaritySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tastedive" => Ok(Self::TasteDive),
            "spotify" => Ok(Self::Spotify),
            other => Err(format!(
                "Unknown SIMILARITY_SOURCE '{}' (expected 'tastedive' or 'spotify')",
                other
            )),
        }
    }
}

impl fmt::Display for SimilaritySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TasteDive => write!(f, "tastedive"),
            Self::Spotify => write!(f, "spotify"),
        }
    }
}

/// Aggregation limits and similarity source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub similarity_source: SimilaritySource,
    /// Candidates kept after merging (0 = unlimited)
    pub max_candidates: usize,
    /// Related names requested per seed
    pub similar_per_seed: u32,
    /// Tracks returned by `recommend` (0 = unlimited)
    pub max_tracks: usize,
    /// Artists taken per genre when seeding from genres
    pub genre_seed_limit: u32,
    /// Concurrent external calls per aggregation step (at least 1)
    pub fanout: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            similarity_source: SimilaritySource::TasteDive,
            max_candidates: 15,
            similar_per_seed: 10,
            max_tracks: 20,
            genre_seed_limit: 5,
            fanout: 1,
        }
    }
}

/// Deduplication key for artist names: whitespace removed, lowercased
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a comma-separated parameter into trimmed, non-empty entries
pub fn parse_seed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// How a candidate entered the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    Seed,
    Similar,
}

/// Artist name awaiting resolution against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCandidate {
    /// First-seen trimmed spelling, used as the search query
    pub name: String,
    pub key: String,
    /// Seed this candidate was found for
    pub source_seed: String,
    pub origin: CandidateOrigin,
}

/// Insertion-ordered candidate set, unique by normalized key
#[derive(Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<ArtistCandidate>,
    keys: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name unless its key is already present; returns whether it was added
    pub fn insert(&mut self, name: &str, source_seed: &str, origin: CandidateOrigin) -> bool {
        let name = name.trim();
        let key = normalize_key(name);
        if key.is_empty() || !self.keys.insert(key.clone()) {
            return false;
        }

        self.candidates.push(ArtistCandidate {
            name: name.to_string(),
            key,
            source_seed: source_seed.to_string(),
            origin,
        });
        true
    }

    /// Keep the first `max` candidates; 0 keeps everything
    pub fn truncate(&mut self, max: usize) {
        if max == 0 || self.candidates.len() <= max {
            return;
        }
        for dropped in self.candidates.drain(max..) {
            self.keys.remove(&dropped.key);
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtistCandidate> {
        self.candidates.iter()
    }
}

/// Resolved artists split by whether they match a seed name
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtistPartition {
    pub input: Vec<Artist>,
    pub similar: Vec<Artist>,
}

/// Split resolved artists into `input` and `similar`, preserving order
///
/// An artist is `input` when its lowercased name contains any lowercased
/// seed as a substring, so "Arijit Singh Live" counts for seed "Arijit Singh".
pub fn partition_by_seeds(artists: Vec<Artist>, seeds: &[String]) -> ArtistPartition {
    let seeds: Vec<String> = seeds
        .iter()
        .map(|seed| seed.trim().to_lowercase())
        .filter(|seed| !seed.is_empty())
        .collect();

    let (input, similar): (Vec<Artist>, Vec<Artist>) = artists.into_iter().partition(|artist| {
        let name = artist.name.to_lowercase();
        seeds.iter().any(|seed| name.contains(seed.as_str()))
    });

    ArtistPartition { input, similar }
}

/// Seeds for an aggregation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedQuery {
    Artists(Vec<String>),
    Genres(Vec<String>),
}

impl SeedQuery {
    /// Build from the `artists` and `genres` query parameters; artists win
    /// when both are present
    pub fn from_params(artists: Option<&str>, genres: Option<&str>) -> ApiResult<Self> {
        let artists = artists.map(parse_seed_list).unwrap_or_default();
        if !artists.is_empty() {
            return Ok(Self::Artists(artists));
        }

        let genres = genres.map(parse_seed_list).unwrap_or_default();
        if !genres.is_empty() {
            return Ok(Self::Genres(genres));
        }

        Err(ApiError::ValidationError(
            "Artists or genres required".to_string(),
        ))
    }
}

/// Response body for recommendations
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendations {
    pub tracks: Vec<Track>,
}

/// Aggregation service over the Spotify and TasteDive clients
#[derive(Clone, Debug)]
pub struct DiscoveryService {
    spotify: SpotifyClient,
    tastedive: Option<TasteDiveClient>,
    config: DiscoveryConfig,
}

impl DiscoveryService {
    /// Create the service
    ///
    /// # Errors
    /// `ApiError::Configuration` when TasteDive is the similarity source but
    /// no TasteDive client is supplied
    pub fn new(
        spotify: SpotifyClient,
        tastedive: Option<TasteDiveClient>,
        config: DiscoveryConfig,
    ) -> ApiResult<Self> {
        if config.similarity_source == SimilaritySource::TasteDive && tastedive.is_none() {
            return Err(ApiError::Configuration(
                "TasteDive similarity source requires a TasteDive client".to_string(),
            ));
        }

        Ok(Self {
            spotify,
            tastedive,
            config: DiscoveryConfig {
                fanout: config.fanout.max(1),
                ..config
            },
        })
    }

    /// Resolve seeds and their similar artists, split into `input`/`similar`
    #[instrument(skip(self))]
    pub async fn resolve_artists(&self, query: SeedQuery) -> ApiResult<ArtistPartition> {
        let seeds = self.seed_names(query, ARTISTS_CONTEXT).await?;
        let resolved = self.resolve_seeds(&seeds, false, ARTISTS_CONTEXT).await?;
        let partition = partition_by_seeds(resolved, &seeds);

        info!(
            seeds = seeds.len(),
            input = partition.input.len(),
            similar = partition.similar.len(),
            "Resolved artists by preference"
        );
        Ok(partition)
    }

    /// Top tracks of every resolved artist, flattened in artist order
    ///
    /// # Errors
    /// `ApiError::NotFound` when no candidate resolves to a catalog artist
    #[instrument(skip(self))]
    pub async fn recommend(&self, query: SeedQuery) -> ApiResult<Recommendations> {
        let seeds = self.seed_names(query, RECOMMENDATIONS_CONTEXT).await?;
        let artists = self
            .resolve_seeds(&seeds, true, RECOMMENDATIONS_CONTEXT)
            .await?;

        if artists.is_empty() {
            return Err(ApiError::NotFound("No artists found on Spotify".to_string()));
        }

        let artist_count = artists.len();
        let spotify = self.spotify.clone();
        let per_artist: Vec<Vec<Track>> = stream::iter(artists)
            .map(move |artist| top_tracks_for(spotify.clone(), artist))
            .buffered(self.config.fanout)
            .try_collect()
            .await?;

        let mut tracks: Vec<Track> = per_artist.into_iter().flatten().collect();
        if self.config.max_tracks > 0 {
            tracks.truncate(self.config.max_tracks);
        }

        info!(
            artists = artist_count,
            tracks = tracks.len(),
            "Built recommendations"
        );
        Ok(Recommendations { tracks })
    }

    /// Artist names tagged with any of the genres, deduplicated in order
    #[instrument(skip(self))]
    pub async fn seeds_from_genres(
        &self,
        genres: &[String],
        context: &'static str,
    ) -> ApiResult<Vec<String>> {
        let spotify = self.spotify.clone();
        let limit = self.config.genre_seed_limit;
        let per_genre: Vec<Vec<Artist>> = stream::iter(genres.to_vec())
            .map(move |genre| {
                let spotify = spotify.clone();
                async move {
                    spotify
                        .search_artists_by_genre(&genre, limit)
                        .await
                        .upstream_context(context)
                }
            })
            .buffered(self.config.fanout)
            .try_collect()
            .await?;

        let mut seen = HashSet::new();
        let seeds: Vec<String> = per_genre
            .into_iter()
            .flatten()
            .map(|artist| artist.name)
            .filter(|name| seen.insert(normalize_key(name)))
            .collect();

        if seeds.is_empty() {
            return Err(ApiError::ValidationError(
                "No artists found for the given genres".to_string(),
            ));
        }

        debug!(genres = genres.len(), seeds = seeds.len(), "Seeded from genres");
        Ok(seeds)
    }

    async fn seed_names(&self, query: SeedQuery, context: &'static str) -> ApiResult<Vec<String>> {
        let seeds = match query {
            SeedQuery::Artists(names) => names,
            SeedQuery::Genres(genres) => self.seeds_from_genres(&genres, context).await?,
        };

        let seeds: Vec<String> = seeds
            .iter()
            .map(|seed| seed.trim())
            .filter(|seed| !seed.is_empty())
            .map(str::to_string)
            .collect();

        if seeds.is_empty() {
            return Err(ApiError::ValidationError(
                "Artists or genres required".to_string(),
            ));
        }
        Ok(seeds)
    }

    /// Expand, merge, truncate, and resolve seeds into unique catalog artists
    async fn resolve_seeds(
        &self,
        seeds: &[String],
        verbose: bool,
        context: &'static str,
    ) -> ApiResult<Vec<Artist>> {
        let this = self.clone();
        let related: Vec<Vec<String>> = stream::iter(seeds.to_vec())
            .map(move |seed| {
                let this = this.clone();
                async move { this.related_names(&seed, verbose, context).await }
            })
            .buffered(self.config.fanout)
            .try_collect()
            .await?;

        let mut candidates = CandidateSet::new();
        for seed in seeds {
            candidates.insert(seed, seed, CandidateOrigin::Seed);
        }
        for (seed, names) in seeds.iter().zip(&related) {
            for name in names {
                candidates.insert(name, seed, CandidateOrigin::Similar);
            }
        }
        candidates.truncate(self.config.max_candidates);

        for candidate in candidates.iter() {
            trace!(
                candidate = %candidate.name,
                source_seed = %candidate.source_seed,
                origin = ?candidate.origin,
                "Candidate"
            );
        }
        debug!(
            candidates = candidates.len(),
            similar = candidates
                .iter()
                .filter(|c| c.origin == CandidateOrigin::Similar)
                .count(),
            "Merged artist candidates"
        );

        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let spotify = self.spotify.clone();
        let matches: Vec<Option<Artist>> = stream::iter(names)
            .map(move |name| {
                let spotify = spotify.clone();
                async move { spotify.find_artist(&name).await.upstream_context(context) }
            })
            .buffered(self.config.fanout)
            .try_collect()
            .await?;

        let mut seen_ids = HashSet::new();
        Ok(matches
            .into_iter()
            .flatten()
            .filter(|artist| seen_ids.insert(artist.id.clone()))
            .collect())
    }

    /// Names the similarity source relates to a seed
    async fn related_names(
        &self,
        seed: &str,
        verbose: bool,
        context: &'static str,
    ) -> ApiResult<Vec<String>> {
        let limit = self.config.similar_per_seed;
        match (self.config.similarity_source, &self.tastedive) {
            (SimilaritySource::TasteDive, Some(tastedive)) => {
                let similar = tastedive
                    .get_similar_artists(seed, SimilarQuery { limit, verbose })
                    .await
                    .upstream_context(context)?;
                Ok(similar.into_iter().map(|artist| artist.name).collect())
            }
            (SimilaritySource::TasteDive, None) => Err(ApiError::Configuration(
                "TasteDive client not configured".to_string(),
            )),
            (SimilaritySource::Spotify, _) => {
                let Some(artist) = self
                    .spotify
                    .find_artist(seed)
                    .await
                    .upstream_context(context)?
                else {
                    debug!(seed = %seed, "Seed not in catalog, no related artists");
                    return Ok(Vec::new());
                };

                let related = self
                    .spotify
                    .related_artists(&artist.id)
                    .await
                    .upstream_context(context)?;
                Ok(related
                    .into_iter()
                    .take(limit as usize)
                    .map(|artist| artist.name)
                    .collect())
            }
        }
    }
}

/// Top tracks of one artist, tagged with the artist's name
async fn top_tracks_for(spotify: SpotifyClient, artist: Artist) -> ApiResult<Vec<Track>> {
    let tracks = spotify
        .artist_top_tracks(&artist.id)
        .await
        .upstream_context(RECOMMENDATIONS_CONTEXT)?;
    Ok(tracks
        .into_iter()
        .map(|track| track.with_source_artist(artist.name.as_str()))
        .collect())
}
