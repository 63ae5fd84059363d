use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::flows::invoker::FlowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The variants mirror the failure taxonomy the UI depends on: validation,
/// provider overload, provider configuration, extraction, and session-state
/// failures each map to a distinct user-facing message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider overloaded")]
    ProviderOverloaded,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Session state error: {0}")]
    SessionState(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        let message = e.to_string();
        match e {
            FlowError::Validation { .. } | FlowError::Template(_) => AppError::Validation(message),
            FlowError::Overloaded => AppError::ProviderOverloaded,
            FlowError::Configuration(_) => AppError::Configuration(message),
            FlowError::Extraction { .. } => AppError::Extraction(message),
            FlowError::Provider(_) => AppError::Llm(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone()),
            AppError::ProviderOverloaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_OVERLOADED",
                "The AI service is temporarily overloaded. Please try again in a few moments."
                    .to_string(),
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Provider configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The AI service is not configured correctly. Please contact support."
                        .to_string(),
                )
            }
            AppError::Extraction(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR", msg.clone())
            }
            AppError::SessionState(msg) => (StatusCode::CONFLICT, "SESSION_STATE", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Cache(e) => {
                tracing::error!("Cache error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CACHE_ERROR",
                    "A cache error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
