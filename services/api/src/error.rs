//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed path, query or body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No token cookie on a gated route
    #[error("Authentication required")]
    Unauthenticated,

    /// Token present but invalid or expired
    #[error("Invalid or expired token")]
    Forbidden,

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Database(err) => {
                tracing::error!("Store operation failed: {}", err);
                ApiError::InternalServerError.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "status": "ERROR",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
