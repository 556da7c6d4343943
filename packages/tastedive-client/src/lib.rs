//! TasteDive API client for Tunebridge
//!
//! TasteDive answers "what is similar to X" across media types. Tunebridge
//! only asks about music, to expand a handful of seed artists into a wider
//! set of related artist names.
//!
//! # Example
//!
//! ```rust,no_run
//! use tunebridge_shared_config::TasteDiveConfig;
//! use tunebridge_tastedive_client::{SimilarQuery, TasteDiveClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TasteDiveClient::new(TasteDiveConfig::from_env()?)?;
//!
//! let similar = client
//!     .get_similar_artists("Arijit Singh", SimilarQuery::default())
//!     .await?;
//! for artist in similar {
//!     println!("{}", artist.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `TASTEDIVE_API_KEY`: API key for TasteDive (required)
//! - `TASTEDIVE_API_URL`: base URL override (optional)

mod client;
mod error;
mod models;

pub use client::{SimilarQuery, TasteDiveClient};
pub use error::{TasteDiveError, TasteDiveResult};
pub use models::SimilarArtist;
