//! Spotify Web API client for Tunebridge
//!
//! Server-to-server access only: the client authenticates with the
//! client-credentials grant and caches the bearer token until it expires.
//!
//! # Example
//!
//! ```rust,no_run
//! use tunebridge_shared_config::SpotifyConfig;
//! use tunebridge_spotify_client::SpotifyClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpotifyClient::new(SpotifyConfig::from_env()?)?;
//!
//! let tracks = client.search_tracks("kesariya", 10).await?;
//! for track in tracks {
//!     println!("{}", track.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`: application credentials (required)
//! - `SPOTIFY_ACCOUNTS_URL`, `SPOTIFY_API_URL`: endpoint overrides (optional)
//! - `SPOTIFY_MARKET`: market for top-track lookups (default `IN`)

mod client;
mod error;
mod models;
mod token;

pub use client::{SpotifyClient, MAX_TRACK_IDS};
pub use error::{SpotifyError, SpotifyResult};
pub use models::{Artist, ArtistRef, Image, Track};
pub use token::{AccessToken, TokenCache};
