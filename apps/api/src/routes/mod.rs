//! HTTP route handlers for the Tunebridge API
//!
//! - Authentication endpoints (`/register`, `/login`, `/logout`, `/dashboard`)
//! - Spotify proxy and aggregation endpoints (`/api/spotify/...`)
//! - Health check endpoints (`/health/...`)

pub mod auth;
pub mod health;
pub mod spotify;

use axum::{extract::Extension, routing::get, Router};

use crate::services::{AuthService, CatalogService, DiscoveryService, HealthService};

pub use auth::{auth_router, AuthState};
pub use health::{health_router, HealthState};
pub use spotify::{spotify_router, SpotifyState};

/// Services backing the HTTP surface
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub discovery: DiscoveryService,
    pub health: HealthService,
}

/// Assemble every route; transport layers (tracing, CORS) are added by the caller
pub fn api_router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(HealthState::new(services.health)))
        .nest(
            "/api/spotify",
            spotify_router(SpotifyState::new(services.catalog, services.discovery)),
        )
        .merge(auth_router(AuthState::new(services.auth.clone())))
        // AuthService as an extension for the SessionUser extractor
        .layer(Extension(services.auth))
}

async fn root() -> &'static str {
    "Tunebridge API"
}
