use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Authentication errors for the club platform
///
/// Every workflow operation maps collaborator failures into this taxonomy;
/// nothing propagates as an uncaught panic or generic exception.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or missing input. Always client-caused, never retried.
    #[error("{0}")]
    Validation(String),

    /// Unknown enrollment number or email.
    #[error("{0}")]
    NotFound(String),

    /// State-machine precondition violated (already verified, already
    /// registered, email mismatch).
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or an invalid/expired token.
    #[error("{0}")]
    Unauthorized(String),

    /// Mail dispatch failed. Reported to the caller, never retried here.
    #[error("{0}")]
    Delivery(String),

    /// Unexpected collaborator failure.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AuthError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AuthError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            AuthError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            AuthError::Delivery(message) => {
                error!(error = %message, "Mail dispatch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            AuthError::Internal(source) => {
                error!(error = %source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
