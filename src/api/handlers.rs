use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{HealthResponse, LanguagesResponse, SynthesisRequest};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::AUDIO_MIME;

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    // Validate input
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Text cannot be empty".into()));
    }

    // Generate audio
    let audio = state
        .tts
        .speak(&request.text, &request.lang, request.slow)
        .await?;

    // Return audio response
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, AUDIO_MIME)], audio).into_response())
}

pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: state.tts.languages(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
