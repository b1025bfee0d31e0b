//! Handlers for the garment catalog.

use axum::extract::State;
use axum::Json;
use vto_core::catalog::{list_garments, GarmentItem};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/garments -- the catalog in natural filename order.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<GarmentItem>>>> {
    let items = list_garments(&state.config.garments_dir)
        .map_err(|e| AppError::InternalError(format!("Failed to read garment catalog: {e}")))?;
    Ok(Json(DataResponse { data: items }))
}
