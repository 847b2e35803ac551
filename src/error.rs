// =============================================================================
// Error taxonomy for the Pulso engine
// =============================================================================
//
// Fetch        — market-data collaborator failure; retried at the next poll
//                tick inside the acquisition loop, never fatal.
// InsufficientData — query issued before enough candles were ingested; the
//                caller should simply try again shortly.
// Generation   — text-generation collaborator failure; recovered via the
//                local fallback narrative, never surfaced as a hard failure.
// Computation  — malformed values reached the scorer; ingestion-side
//                sanitization makes this unreachable in practice.
// =============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum EngineError {
    Fetch(String),
    InsufficientData(String),
    Generation(String),
    Computation(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(msg) => write!(f, "fetch_error: {msg}"),
            Self::InsufficientData(msg) => write!(f, "insufficient_data: {msg}"),
            Self::Generation(msg) => write!(f, "generation_error: {msg}"),
            Self::Computation(msg) => write!(f, "computation_error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Fetch(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::InsufficientData(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::Generation(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Computation(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        // The public API speaks Portuguese: errors ride under `erro`.
        let body = json!({ "erro": message });
        (status, axum::Json(body)).into_response()
    }
}
