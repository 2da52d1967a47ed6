//! Voice catalogue for speech synthesis.

use serde::Serialize;

pub const DEFAULT_VOICE_KEY: &str = "bella";

/// A synthesis voice offered to users.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Stable key used by clients.
    pub key: &'static str,
    /// Provider voice id.
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub description: &'static str,
}

static VOICES: [Voice; 9] = [
    Voice { key: "rachel", id: "21m00Tcm4TlvDq8ikWAM", name: "Rachel", gender: "female", description: "Warm, calm" },
    Voice { key: "domi", id: "AZnzlk1XvdvUeBnXmlld", name: "Domi", gender: "female", description: "Soft, gentle" },
    Voice { key: "bella", id: "EXAVITQu4vr4xnSDxMaL", name: "Bella", gender: "female", description: "Soothing, meditative" },
    Voice { key: "elli", id: "MF3mGyEYCl7XYWbV9V6O", name: "Elli", gender: "female", description: "Clear, peaceful" },
    Voice { key: "adam", id: "pNInz6obpgDQGcFmaJgB", name: "Adam", gender: "male", description: "Deep, calming" },
    Voice { key: "antoni", id: "ErXwobaYiN019PkySvjV", name: "Antoni", gender: "male", description: "Warm, reassuring" },
    Voice { key: "josh", id: "TxGEqnHWrfWFTfGW9XjX", name: "Josh", gender: "male", description: "Smooth, relaxing" },
    Voice { key: "charlotte", id: "XB0fDUnXU5powFXDhCwa", name: "Charlotte", gender: "female", description: "Professional, clear" },
    Voice { key: "dorothy", id: "ThT5KcBeYPX3keUQqHPh", name: "Dorothy", gender: "female", description: "Mature, wise" },
];

impl Voice {
    pub fn all() -> &'static [Voice] {
        &VOICES
    }

    pub fn find(key: &str) -> Option<&'static Voice> {
        VOICES.iter().find(|v| v.key == key)
    }

    pub fn default_voice() -> &'static Voice {
        // The default key is part of the static table above.
        Self::find(DEFAULT_VOICE_KEY).unwrap_or(&VOICES[0])
    }
}

/// Synthesis tuning tuned for slow, calm narration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.75,
            similarity_boost: 0.75,
            style: 0.3,
            use_speaker_boost: true,
        }
    }
}
