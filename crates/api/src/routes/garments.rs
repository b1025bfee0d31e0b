use axum::{routing::get, Router};

use crate::handlers::garments;
use crate::state::AppState;

/// Mount garment catalog routes under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/garments", get(garments::list))
}
