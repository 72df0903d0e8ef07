use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::code_runner::CodeRunnerError;
use crate::llm_client::LlmError;
use crate::transcription::TranscriptionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": message, "code": CODE}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Code runner error: {0}")]
    CodeRunner(#[from] CodeRunnerError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication required".to_string())
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e:?}");
                let status = if e.is_rate_limit() {
                    StatusCode::TOO_MANY_REQUESTS
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, "LLM_ERROR", e.user_message())
            }
            AppError::Transcription(e) => {
                tracing::error!("Transcription error: {e:?}");
                match e {
                    TranscriptionError::EmptyAudio => (
                        StatusCode::BAD_REQUEST,
                        "EMPTY_AUDIO",
                        "The recorded audio file was empty.".to_string(),
                    ),
                    TranscriptionError::MissingApiKey => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "TRANSCRIPTION_UNAVAILABLE",
                        "Transcription service is not configured.".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "TRANSCRIPTION_ERROR",
                        format!("Transcription failed: {e}"),
                    ),
                }
            }
            AppError::CodeRunner(e) => {
                tracing::error!("Code runner error: {e:?}");
                match e {
                    CodeRunnerError::MissingApiKey => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "CODE_RUNNER_UNAVAILABLE",
                        "Code execution service is not configured.".to_string(),
                    ),
                    _ => (StatusCode::BAD_GATEWAY, "CODE_RUNNER_ERROR", e.to_string()),
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let (status, code, message) =
            AppError::Validation("Missing conversation history.".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "Missing conversation history.");
    }

    #[test]
    fn test_unprocessable_entity_maps_to_422() {
        let (status, code, message) =
            AppError::UnprocessableEntity("Could not extract text from PDF.".into()).parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "UNPROCESSABLE_ENTITY");
        assert_eq!(message, "Could not extract text from PDF.");
    }

    #[test]
    fn test_llm_rate_limit_maps_to_429_with_friendly_message() {
        let (status, _, message) = AppError::Llm(LlmError::RateLimited { retries: 3 }).parts();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(message.contains("rate limit"));
    }

    #[test]
    fn test_transcription_timeout_is_bad_gateway() {
        let (status, _, message) = AppError::Transcription(TranscriptionError::TimedOut).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(message.starts_with("Transcription failed"));
    }

    #[test]
    fn test_empty_audio_is_rejected_as_bad_request() {
        let (status, code, _) = AppError::Transcription(TranscriptionError::EmptyAudio).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "EMPTY_AUDIO");
    }

    #[test]
    fn test_internal_hides_detail() {
        let (status, _, message) =
            AppError::Internal(anyhow::anyhow!("secret connection string")).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
