//! Shared test utilities for Tunebridge workspace
//!
//! Mock implementations of the external HTTP APIs Tunebridge talks to, so
//! client and aggregation tests run without network access.
//!
//! # Mock Services
//!
//! - [`MockSpotifyServer`] - token exchange, search, top tracks, related artists, tracks
//! - [`MockTasteDiveServer`] - the `similar` endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use tunebridge_test_utils::{MockSpotifyServer, MockTasteDiveServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let spotify = MockSpotifyServer::start_authenticated().await;
//!     spotify.mock_artist_search("Arijit Singh", Some(artist_json("a1", "Arijit Singh"))).await;
//!
//!     // Use spotify.config() to build a SpotifyClient
//! }
//! ```

mod spotify;
mod tastedive;

pub use spotify::{artist_json, track_json, MockSpotifyServer};
pub use tastedive::MockTasteDiveServer;
