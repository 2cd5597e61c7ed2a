use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    /// Transition attempted from the wrong attempt phase. Correct client
    /// wiring never triggers this.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Out-of-range index or malformed stored data. Always a defect, never
    /// a recoverable user condition.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("{1}")]
    Api(StatusCode, String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            ServerError::InvariantViolation(msg) => {
                error!("Invariant violation: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::Persistence(msg) => {
                error!("Persistence failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied".into()),
            ServerError::Api(status, msg) => (status, msg),
            ServerError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            ServerError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            ServerError::Json(e) => {
                error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
