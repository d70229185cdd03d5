//! Demo training endpoint

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use pestvision::backend::default_device;
use pestvision::{train_demo, DemoTrainingReport};

use crate::state::SharedState;

/// POST /train - Run the illustrative demo-training pass.
///
/// Trains on random synthetic data, overwrites the persisted artifact and
/// swaps the updated model into the cached handle. Blocking for its whole
/// duration; the demo deployment is single-user.
pub async fn train(
    State(state): State<SharedState>,
) -> Result<Json<DemoTrainingReport>, (StatusCode, String)> {
    let handle = state.provider.get_or_init(&default_device()).map_err(|e| {
        error!("Classifier unavailable: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let model_dir = state.config.model_dir.clone();
    let report = tokio::task::spawn_blocking(move || train_demo(&handle, &model_dir, None))
        .await
        .map_err(|e| {
            error!("Training task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Training task failed".to_string(),
            )
        })?
        .map_err(|e| {
            error!("Demo training failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(report))
}
