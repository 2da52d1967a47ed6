//! HTTP handlers for meditation generation, voice and history endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::ApiError;
use crate::application::handlers::meditation::{
    GenerateMeditationCommand, GenerateMeditationHandler, ListMeditationsHandler,
    ListMeditationsQuery, ListVoicesHandler, SynthesizeVoiceCommand, SynthesizeVoiceError,
    SynthesizeVoiceHandler,
};
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::meditation::MeditationError;

use super::dto::{
    GenerateRequest, GenerateResponse, MeditationHistoryItem, MeditationListResponse,
    MeditationResponse, VoiceListResponse, VoiceRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MeditationAppState {
    pub generate_handler: Arc<GenerateMeditationHandler>,
    /// Absent without a speech provider key.
    pub voice_handler: Option<Arc<SynthesizeVoiceHandler>>,
    pub list_voices_handler: Arc<ListVoicesHandler>,
    /// Absent without a database.
    pub history_handler: Option<Arc<ListMeditationsHandler>>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/generate - Generate a personalized meditation.
pub async fn generate_meditation(
    State(state): State<MeditationAppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected generate body");
        ApiError::bad_request("Invalid request body")
    })?;

    let meditation = state
        .generate_handler
        .handle(GenerateMeditationCommand {
            input: request.into(),
        })
        .await
        .map_err(meditation_error)?;

    Ok(Json(GenerateResponse {
        success: true,
        meditation: MeditationResponse::from(&meditation),
    }))
}

/// POST /api/voice - Synthesize text to MPEG audio.
pub async fn synthesize_voice(
    State(state): State<MeditationAppState>,
    body: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::bad_request("Invalid request body"))?;
    let handler = state
        .voice_handler
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Voice synthesis not configured"))?;

    let audio = handler
        .handle(SynthesizeVoiceCommand {
            text: request.text,
            voice_key: request.voice_id,
        })
        .await
        .map_err(|e| match e {
            SynthesizeVoiceError::TextRequired | SynthesizeVoiceError::UnknownVoice(_) => {
                ApiError::bad_request(e.to_string())
            }
            SynthesizeVoiceError::Synthesis(_) => ApiError::internal("Failed to synthesize audio"),
        })?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

/// GET /api/voice - Voice catalogue and remaining quota.
pub async fn list_voices(
    State(state): State<MeditationAppState>,
) -> Result<impl IntoResponse, ApiError> {
    if state.voice_handler.is_none() {
        return Err(ApiError::unavailable("Voice synthesis not configured"));
    }
    let catalogue = state.list_voices_handler.handle().await;
    Ok(Json(VoiceListResponse::from(catalogue)))
}

/// GET /api/meditations/:user_id - The user's ten most recent meditations.
pub async fn list_meditations(
    State(state): State<MeditationAppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state
        .history_handler
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Database not configured"))?;
    let user_id = UserId::new(user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let meditations = handler
        .handle(ListMeditationsQuery { user_id })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Meditation history lookup failed");
            ApiError::internal("Internal server error")
        })?;

    Ok(Json(MeditationListResponse {
        meditations: meditations.iter().map(MeditationHistoryItem::from).collect(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

fn meditation_error(err: MeditationError) -> ApiError {
    match err {
        MeditationError::Validation(validation) => ApiError::bad_request(validation_message(&validation)),
        MeditationError::GenerationFailed(_) => {
            ApiError::internal("Failed to generate meditation script")
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyField { field } if field == "goals" => "Goals are required".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn missing_goals_message() {
        let api = meditation_error(MeditationError::Validation(ValidationError::empty_field("goals")));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Goals are required");
    }

    #[test]
    fn generation_failure_is_500() {
        let api = meditation_error(MeditationError::GenerationFailed("down".to_string()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Failed to generate meditation script");
    }
}
