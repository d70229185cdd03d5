//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use pestvision::backend::backend_name;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub backend: String,
    /// Whether a persisted artifact is present on disk
    pub artifact_present: bool,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend_name().to_string(),
        artifact_present: state.provider.paths().weights_exist(),
    })
}
