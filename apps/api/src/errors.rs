use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::job::TransitionError;
use crate::sourcing::source::SourceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as a single `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing precondition: {0}")]
    PreconditionMissing(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Candidate source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Oracle output could not be parsed: {0}")]
    MalformedOutput(String),

    #[error("Database error: {0}")]
    PersistenceFailure(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => AppError::EmptyResponse,
            LlmError::Parse(e) => AppError::MalformedOutput(e.to_string()),
            other => AppError::OracleUnavailable(other.to_string()),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::SourceUnavailable(err.to_string())
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::InvalidTransition(err.to_string())
    }
}

impl AppError {
    /// Status code and the message shown to the caller.
    /// Oracle and database details stay in the logs.
    fn public_parts(&self) -> (StatusCode, String) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PreconditionMissing(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::SourceUnavailable(msg) => {
                tracing::error!("Candidate source error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::OracleUnavailable(msg) => {
                tracing::error!("Oracle error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The AI service is unavailable. Please try again.".to_string(),
                )
            }
            AppError::EmptyResponse => {
                tracing::error!("Oracle returned no content");
                (
                    StatusCode::BAD_GATEWAY,
                    "The AI service returned an empty response.".to_string(),
                )
            }
            AppError::MalformedOutput(msg) => {
                tracing::error!("Oracle output rejected: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The AI service returned output that could not be read.".to_string(),
                )
            }
            AppError::PersistenceFailure(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database save failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.public_parts();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
