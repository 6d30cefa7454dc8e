//! Error types for netwith-ds

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// netwith-common error
    #[error("Common error: {0}")]
    Common(#[from] netwith_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => common_error_response(err),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Map shared-crate errors onto HTTP statuses.
///
/// Discovery errors carry their own semantics: an empty candidate pool is a
/// 404 (nothing to discover), an unstarted session is a 409 (the client
/// called out of order and can recover by starting a session).
fn common_error_response(err: &netwith_common::Error) -> (StatusCode, &'static str, String) {
    use netwith_common::Error;

    match err {
        Error::EmptyPool => (StatusCode::NOT_FOUND, "EMPTY_POOL", err.to_string()),
        Error::EmptySession => (StatusCode::CONFLICT, "EMPTY_SESSION", err.to_string()),
        Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string()),
        Error::Fetch(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "FETCH_ERROR",
            err.to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "COMMON_ERROR",
            err.to_string(),
        ),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
