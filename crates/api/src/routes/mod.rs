//! Route modules and the `/api/v1` router assembly.

pub mod batches;
pub mod garments;
pub mod health;
pub mod tryon;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Assemble all `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(uploads::router())
        .merge(garments::router())
        .merge(tryon::router())
        .merge(batches::router())
}
