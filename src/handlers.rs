use crate::config::Config;
use crate::errors::AppError;
use crate::lookup::SkipTraceService;
use crate::models::{NormalizedIdentity, SkipTraceQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lookup service owning the upstream client and the cache store.
    pub service: SkipTraceService,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "skip-trace-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/skip-trace
///
/// Resolves a skip-trace query to a normalized identity record, served from
/// the cache when a fresh entry exists.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `query` - JSON body with the identity facts and match-requirement flags.
///
/// # Returns
///
/// * `Result<Json<NormalizedIdentity>, AppError>` - The normalized record, a
///   400 for invalid input, or a 502 for provider failures.
pub async fn skip_trace(
    State(state): State<Arc<AppState>>,
    Json(query): Json<SkipTraceQuery>,
) -> Result<Json<NormalizedIdentity>, AppError> {
    tracing::info!("POST /api/v1/skip-trace");

    let record = state.service.lookup(&query).await?;

    tracing::info!(
        "Skip trace resolved (match: {}, confidence: {:?})",
        record.is_match,
        record.match_confidence
    );

    Ok(Json(record))
}

/// GET /api/v1/properties/:id
///
/// Returns the cached property-detail payload for a provider property id,
/// fetching it on a miss.
pub async fn property_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("GET /api/v1/properties/{}", id);

    let detail = state.service.property_detail(&id).await?;
    Ok(Json(detail))
}
