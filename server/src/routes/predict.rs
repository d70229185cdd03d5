//! Prediction endpoint - classify one uploaded pest image

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use pestvision::backend::default_device;
use pestvision::{PestPrediction, PestVisionError, Predictor};

use crate::state::SharedState;

/// POST /predict - Run the classifier on an uploaded JPEG/PNG image.
///
/// Expects a multipart form with a `file` field. Undecodable input is a 400;
/// artifact faults surface as 500.
pub async fn predict(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<PestPrediction>, (StatusCode, String)> {
    let bytes = read_upload(multipart).await?;

    let handle = state.provider.get_or_init(&default_device()).map_err(|e| {
        error!("Classifier unavailable: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    // The forward pass is a blocking CPU call
    let prediction = tokio::task::spawn_blocking(move || {
        let predictor = Predictor::from_metadata(&handle.metadata);
        predictor.predict(&handle, &bytes)
    })
    .await
    .map_err(|e| {
        error!("Prediction task failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Prediction task failed".to_string(),
        )
    })?
    .map_err(|e| match e {
        PestVisionError::Decode(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        other => {
            error!("Prediction failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    })?;

    Ok(Json(prediction))
}

/// Pull the image bytes out of the multipart upload (the `file` field, or
/// the first field present).
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart upload: {}", e),
        )
    })? {
        let is_file = matches!(field.name(), None | Some("file"));
        if is_file {
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read upload: {}", e),
                )
            })?;
            if !bytes.is_empty() {
                return Ok(bytes.to_vec());
            }
        }
    }

    Err((
        StatusCode::BAD_REQUEST,
        "No image file found in upload".to_string(),
    ))
}
