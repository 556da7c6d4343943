//! Health check service for verifying external dependencies
//!
//! This service provides health checks for the infrastructure requests depend on:
//! - PostgreSQL (user and session store)
//! - Spotify accounts service (client-credentials token)

use serde::Serialize;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tunebridge_spotify_client::SpotifyClient;

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
    /// Service check was skipped (e.g., optional service not configured)
    Skipped,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy service result
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: None,
        }
    }

    /// Create an unhealthy service result with response time
    pub fn unhealthy(name: &'static str, error: impl Into<String>, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: Some(error.into()),
        }
    }

    /// Create a skipped service result
    pub fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: ServiceStatus::Skipped,
            response_time_ms: None,
            error: None,
        }
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if every checked service is healthy)
    pub status: ServiceStatus,
    /// Individual service health results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all health checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    /// Create a new health check response from individual service results
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services
            .iter()
            .all(|s| s.status != ServiceStatus::Unhealthy)
        {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Check if overall health is good
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service for verifying external dependencies
#[derive(Clone)]
pub struct HealthService {
    pool: PgPool,
    spotify: Option<SpotifyClient>,
}

impl HealthService {
    /// Create a health service that checks the database only
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            spotify: None,
        }
    }

    /// Also check that a Spotify token can be obtained
    pub fn with_spotify(mut self, spotify: SpotifyClient) -> Self {
        self.spotify = Some(spotify);
        self
    }

    /// Check PostgreSQL connectivity with `SELECT 1`
    pub async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();

        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => ServiceHealth::healthy("database", start.elapsed()),
            Err(e) => {
                ServiceHealth::unhealthy("database", format!("Query failed: {}", e), start.elapsed())
            }
        }
    }

    /// Check Spotify credentials by fetching (or reusing) an access token
    pub async fn check_spotify(&self) -> ServiceHealth {
        let Some(spotify) = &self.spotify else {
            return ServiceHealth::skipped("spotify");
        };

        let start = Instant::now();
        match spotify.access_token().await {
            Ok(_) => ServiceHealth::healthy("spotify", start.elapsed()),
            Err(e) => ServiceHealth::unhealthy(
                "spotify",
                format!("Token exchange failed: {}", e),
                start.elapsed(),
            ),
        }
    }

    /// Run all health checks in parallel
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();

        let (db_health, spotify_health) = tokio::join!(self.check_database(), self.check_spotify());

        HealthCheckResponse::new(vec![db_health, spotify_health], start.elapsed())
    }
}
