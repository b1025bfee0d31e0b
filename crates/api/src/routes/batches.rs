use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::batches;
use crate::state::AppState;

/// Mount batch session routes under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batches", post(batches::create).get(batches::list_active))
        .route("/batches/{session_id}/status", get(batches::status))
        .route("/batches/{session_id}/results", get(batches::results))
        .route("/batches/{session_id}", delete(batches::cleanup))
}
