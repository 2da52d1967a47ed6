//! Axum router configuration for meditation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    generate_meditation, list_meditations, list_voices, synthesize_voice, MeditationAppState,
};

/// Meditation routes, mounted under `/api`.
///
/// # Routes
/// - `POST /generate` - Generate a meditation script (and audio when enabled)
/// - `POST /voice` - Synthesize text to audio
/// - `GET /voice` - Voice catalogue and quota
/// - `GET /meditations/:user_id` - Recent meditations of a user
pub fn meditation_router() -> Router<MeditationAppState> {
    Router::new()
        .route("/generate", post(generate_meditation))
        .route("/voice", post(synthesize_voice).get(list_voices))
        .route("/meditations/:user_id", get(list_meditations))
}
