//! Handlers for batch try-on sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vto_batch::{ResultsView, StatusView};
use vto_core::catalog::list_garments;
use vto_core::error::CoreError;
use vto_core::naming::person_image_filename;
use vto_core::types::SessionId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for starting a batch.
#[derive(Debug, Deserialize)]
pub struct StartBatchRequest {
    pub session_id: String,
}

/// Response for an accepted batch submission.
#[derive(Debug, Serialize)]
pub struct StartBatchResponse {
    pub session_id: String,
    pub total_items: usize,
}

/// POST /api/v1/batches
///
/// Starts a try-everything batch for the session's uploaded person
/// image. Returns 202 as soon as the session is registered; progress is
/// polled via the status route.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<StartBatchRequest>,
) -> AppResult<(StatusCode, Json<StartBatchResponse>)> {
    let person_path = state
        .config
        .uploads_dir
        .join(person_image_filename(&input.session_id));
    if !person_path.is_file() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Person image",
            id: input.session_id.clone(),
        }));
    }

    let items = list_garments(&state.config.garments_dir)
        .map_err(|e| AppError::InternalError(format!("Failed to read garment catalog: {e}")))?;
    let total_items = items.len();

    state
        .coordinator
        .start_batch(input.session_id.clone(), person_path, items)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartBatchResponse {
            session_id: input.session_id,
            total_items,
        }),
    ))
}

/// GET /api/v1/batches -- ids of sessions currently processing.
pub async fn list_active(State(state): State<AppState>) -> Json<DataResponse<Vec<SessionId>>> {
    Json(DataResponse {
        data: state.coordinator.active_sessions().await,
    })
}

/// GET /api/v1/batches/{session_id}/status
pub async fn status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<StatusView>> {
    Ok(Json(state.coordinator.get_status(&session_id).await?))
}

/// GET /api/v1/batches/{session_id}/results
///
/// 409 NOT_READY until the session completes; partial results are
/// never returned.
pub async fn results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ResultsView>> {
    Ok(Json(state.coordinator.get_results(&session_id).await?))
}

/// DELETE /api/v1/batches/{session_id} -- idempotent cleanup.
pub async fn cleanup(State(state): State<AppState>, Path(session_id): Path<String>) -> StatusCode {
    state.coordinator.cleanup_session(&session_id).await;
    StatusCode::NO_CONTENT
}
