use axum::extract::DefaultBodyLimit;
use axum::{routing::post, Router};

use crate::handlers::uploads;
use crate::state::AppState;

/// Maximum accepted upload size (16 MB).
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Mount upload routes under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/uploads", post(uploads::create))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
