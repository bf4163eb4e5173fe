//! Custom error types for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the authentication service
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or invalid request payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No user is registered under the submitted email
    #[error("No record exists")]
    NoSuchUser,

    /// The submitted password does not match
    #[error("Incorrect email or password")]
    BadCredentials,

    /// A unique field is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<common::error::DatabaseError> for AuthError {
    fn from(err: common::error::DatabaseError) -> Self {
        match err {
            common::error::DatabaseError::Conflict(msg) => AuthError::Conflict(msg),
            other => {
                tracing::error!("Store operation failed: {}", other);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::NoSuchUser => StatusCode::NOT_FOUND,
            AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            AuthError::BadRequest(msg) | AuthError::Conflict(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "status": "ERROR",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
