//! Business logic services for Tunebridge
//!
//! This module contains:
//! - Authentication and server-side sessions
//! - Spotify catalog lookups
//! - Artist discovery and recommendation aggregation
//! - Health checks

pub mod auth;
pub mod catalog;
pub mod discovery;
pub mod health;
pub mod session;

pub use auth::{AuthConfig, AuthService, Registration};
pub use catalog::CatalogService;
pub use discovery::{DiscoveryConfig, DiscoveryService, SeedQuery, SimilaritySource};
pub use health::HealthService;
pub use session::SessionCookies;
