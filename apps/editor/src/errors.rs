use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compiler::CompilerError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// None of these are fatal: the editor stays usable after any single
/// failure, and the view renders the message as a dismissible notification.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator (document store, compiler service) was unreachable
    /// or answered with an unexpected error.
    #[error("Upstream failure: {0}")]
    Transport(String),

    /// The compiler ran and rejected the document. The reason is passed to
    /// the user verbatim, never retried.
    #[error("{0}")]
    Compile(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl From<CompilerError> for AppError {
    fn from(e: CompilerError) -> Self {
        match e {
            CompilerError::Rejected(reason) => AppError::Compile(reason),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Transport(msg) => {
                tracing::error!("Upstream failure: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILURE", msg.clone())
            }
            AppError::Compile(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "COMPILE_FAILED",
                reason.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
