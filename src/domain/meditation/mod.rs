//! Meditation domain - requests, generated meditations and voice data.

mod errors;
mod meditation;
mod prompt;
mod request;
mod script;
mod title;
mod voice;

pub use errors::MeditationError;
pub use meditation::{Meditation, SCRIPT_LANGUAGE};
pub use prompt::{PromptBuilder, ScriptPrompt, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use request::{
    MeditationRequest, MeditationRequestInput, DEFAULT_DURATION_MINUTES, DEFAULT_PREFERRED_TIME,
    DEFAULT_STRESS_LEVEL, MAX_DURATION_MINUTES,
};
pub use script::prepare_for_speech;
pub use title::{pick_title, titles_for};
pub use voice::{Voice, VoiceSettings, DEFAULT_VOICE_KEY};
