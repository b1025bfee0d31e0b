use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vto_batch::CoordinatorError;
use vto_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vto-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A coordinator error (unknown session, premature results read,
    /// duplicate submission).
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{id}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Coordinator errors ---
            AppError::Coordinator(err) => match err {
                CoordinatorError::SessionNotFound(_) => {
                    (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", err.to_string())
                }
                CoordinatorError::NotReady(_) => {
                    (StatusCode::CONFLICT, "NOT_READY", err.to_string())
                }
                CoordinatorError::SessionExists(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
