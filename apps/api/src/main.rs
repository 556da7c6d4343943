use axum::http::{header, Method};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunebridge_api::config::Config;
use tunebridge_api::services::{
    AuthConfig, AuthService, CatalogService, DiscoveryService, HealthService,
};
use tunebridge_api::{api_router, AppServices};
use tunebridge_spotify_client::SpotifyClient;
use tunebridge_tastedive_client::TasteDiveClient;

/// How often expired session rows are deleted
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                // Credentials are needed for the session cookie
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .allow_credentials(true)
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// Periodically delete expired sessions
fn spawn_session_purger(auth_service: AuthService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match auth_service.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunebridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!(
        port = config.port,
        environment = ?config.environment(),
        similarity_source = %config.discovery.similarity_source,
        "Starting Tunebridge API server"
    );

    // Initialize database pool
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database().max_connections)
        .acquire_timeout(Duration::from_secs(config.database().connect_timeout_secs))
        .connect(&config.database().url)
        .await?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    // External API clients
    let spotify = SpotifyClient::new(config.spotify().clone())?;
    let tastedive = config
        .tastedive()
        .cloned()
        .map(TasteDiveClient::new)
        .transpose()?;
    tracing::info!(tastedive = tastedive.is_some(), "API clients initialized");

    let auth_config = AuthConfig::new(config.session_secret.clone())
        .with_cookie_name(config.session_cookie_name.clone())
        .with_ttl_string(&config.session_ttl)
        .with_secure_cookies(config.is_production());
    let auth_service = AuthService::new(pool.clone(), auth_config);
    spawn_session_purger(auth_service.clone());

    let services = AppServices {
        auth: auth_service,
        catalog: CatalogService::new(spotify.clone()),
        discovery: DiscoveryService::new(spotify.clone(), tastedive, config.discovery.clone())?,
        health: HealthService::new(pool).with_spotify(spotify),
    };

    let app = api_router(services)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
