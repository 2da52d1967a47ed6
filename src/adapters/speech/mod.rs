//! Speech synthesis adapters.

mod elevenlabs;

pub use elevenlabs::{ElevenLabsConfig, ElevenLabsSynthesizer, ELEVENLABS_BASE_URL, ELEVENLABS_MODEL};
