// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The surface is read-only: queries are
// computed from the latest committed store snapshot, so concurrent requests
// never contend with the acquisition loop beyond the brief snapshot clone.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis;
use crate::app_state::AppState;
use crate::error::EngineError;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/snapshot", get(snapshot))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    candles: usize,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        candles: state.store.len(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Snapshot
// =============================================================================

async fn snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(analysis::build_snapshot(&state))
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Debug, Deserialize, Default)]
struct AnalyzeRequest {
    /// Optional free-text question forwarded to the narrative layer.
    #[serde(default)]
    note: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<AnalyzeRequest>>,
) -> Result<impl IntoResponse, EngineError> {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    info!(note_len = req.note.len(), "analyze requested");

    let out = analysis::analyze(&state, &req.note).await?;
    Ok(Json(out))
}
