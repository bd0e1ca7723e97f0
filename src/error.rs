use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Failures reported by a synthesis backend. The `Display` text is what the
/// caller ends up seeing in the `detail` field.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("No text to send to TTS API")]
    EmptyText,

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("{status} ({reason}) from TTS API. Probable cause: {cause}")]
    Upstream {
        status: u16,
        reason: String,
        cause: String,
    },

    #[error("Failed to connect. Probable cause: {0}")]
    Connection(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            AppError::Backend(_) => (StatusCode::BAD_REQUEST, "TTS_ERROR"),
        };
        let detail = self.to_string();

        tracing::error!("Request failed: {} - {}", code, detail);

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Failures seen by the orchestrator when talking to the API service.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("API error: {detail}")]
    Api { status: u16, detail: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_keep_their_message() {
        let err = AppError::from(BackendError::UnsupportedLanguage("xx".into()));
        assert_eq!(err.to_string(), "Language not supported: xx");
    }

    #[test]
    fn every_app_error_is_a_client_error() {
        let errors = [
            AppError::Validation("Text cannot be empty".into()),
            AppError::InvalidPayload("missing field `text`".into()),
            AppError::Backend(BackendError::EmptyText),
        ];
        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn api_error_renders_detail() {
        let err = ClientError::Api {
            status: 400,
            detail: "Language not supported: xx".into(),
        };
        assert_eq!(err.to_string(), "API error: Language not supported: xx");
    }
}
