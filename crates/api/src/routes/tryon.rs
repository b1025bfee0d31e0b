use axum::{routing::post, Router};

use crate::handlers::tryon;
use crate::state::AppState;

/// Mount the single try-on route under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/try-on", post(tryon::create))
}
