//! Handler for single-garment try-on.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use vto_core::catalog::validate_garment_filename;
use vto_core::error::CoreError;
use vto_core::naming::{garment_name, person_image_filename, result_filename};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Samples requested per try-on call.
const SAMPLE_COUNT: u8 = 1;

/// Request body for a single try-on.
#[derive(Debug, Deserialize)]
pub struct TryOnRequest {
    pub session_id: String,
    /// Catalog filename of the garment to try on.
    pub garment: String,
}

/// Response for a successful single try-on.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub result_filename: String,
}

/// POST /api/v1/try-on
///
/// Synchronous single-item try-on: blocks until the remote call
/// returns, which can take tens of seconds.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TryOnRequest>,
) -> AppResult<Json<TryOnResponse>> {
    validate_garment_filename(&input.garment)?;

    let person_path = state
        .config
        .uploads_dir
        .join(person_image_filename(&input.session_id));
    let garment_path = state.config.garments_dir.join(&input.garment);

    if !person_path.is_file() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Person image",
            id: input.session_id.clone(),
        }));
    }
    if !garment_path.is_file() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Garment",
            id: input.garment.clone(),
        }));
    }

    let image = state
        .invoker
        .try_on(&person_path, &garment_path, SAMPLE_COUNT)
        .await
        .map_err(|e| AppError::InternalError(format!("Virtual try-on failed: {e}")))?;

    let filename = result_filename(&input.session_id, garment_name(&input.garment));
    let path = state.config.results_dir.join(&filename);
    tokio::fs::write(&path, &image.jpeg)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to save result image: {e}")))?;

    Ok(Json(TryOnResponse {
        result_filename: filename,
    }))
}
