//! Meditation handlers.

mod generate_meditation;
mod list_meditations;
mod synthesize_voice;

pub use generate_meditation::{AudioPipeline, GenerateMeditationCommand, GenerateMeditationHandler};
pub use list_meditations::{ListMeditationsHandler, ListMeditationsQuery, HISTORY_LIMIT};
pub use synthesize_voice::{
    ListVoicesHandler, SynthesizeVoiceCommand, SynthesizeVoiceError, SynthesizeVoiceHandler,
    VoiceCatalogue,
};
