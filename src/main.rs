mod cache_storage;
mod confidence;
mod config;
mod db;
mod errors;
mod fingerprint;
mod gateway_client;
mod handlers;
mod integrity;
mod lookup;
mod models;
mod normalizer;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache_storage::CacheStorage;
use crate::config::Config;
use crate::db::Database;
use crate::gateway_client::SkipTraceClient;
use crate::lookup::SkipTraceService;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the SQLite-backed cache store, and the
/// upstream client, then serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skip_trace_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool and cache tables
    let db = Database::new(&config.database_url).await?;
    let storage = CacheStorage::new(db.pool.clone());
    storage
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    tracing::info!("Cache store initialized");

    // Initialize the upstream provider client
    let client = SkipTraceClient::new(
        &config.reapi_base_url,
        config.reapi_api_key.clone(),
        config.reapi_user_id.clone(),
        Duration::from_secs(config.request_timeout_seconds),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;
    tracing::info!("Skip trace client initialized: {}", config.reapi_base_url);

    let service = SkipTraceService::new(
        client,
        storage,
        config.skip_trace_ttl_seconds,
        config.cache_ttl_seconds,
    );

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        service,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/skip-trace", post(handlers::skip_trace))
        .route("/api/v1/properties/:id", get(handlers::property_detail))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
