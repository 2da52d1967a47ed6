//! Voice synthesis configuration (ElevenLabs)

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Voice endpoints answer 503 without a key
    pub elevenlabs_api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model_id: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl VoiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        self.elevenlabs_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: None,
            model_id: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}
