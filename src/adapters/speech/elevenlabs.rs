//! ElevenLabs speech synthesizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::meditation::{Voice, VoiceSettings};
use crate::ports::{SpeechError, SpeechSynthesizer, VoiceQuota};

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
/// Multilingual model; the scripts are Polish.
pub const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

#[derive(Clone)]
pub struct ElevenLabsConfig {
    api_key: SecretString,
    pub model_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model_id: ELEVENLABS_MODEL.to_string(),
            base_url: ELEVENLABS_BASE_URL.to_string(),
            // Long scripts take a while to render.
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct ElevenLabsSynthesizer {
    config: ElevenLabsConfig,
    client: Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: ElevenLabsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn speech_url(&self, voice: &Voice) -> String {
        format!("{}/text-to-speech/{}", self.config.base_url, voice.id)
    }

    fn quota_url(&self) -> String {
        format!("{}/user/subscription", self.config.base_url)
    }
}

fn classify_status(status: u16, message: String) -> SpeechError {
    match status {
        _ if message.contains("quota_exceeded") => SpeechError::QuotaExceeded,
        401 => SpeechError::AuthenticationFailed,
        429 => SpeechError::QuotaExceeded,
        _ => SpeechError::Provider { status, message },
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        settings: VoiceSettings,
    ) -> Result<Vec<u8>, SpeechError> {
        let body = SpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: settings,
        };

        let response = self
            .client
            .post(self.speech_url(voice))
            .header("xi-api-key", self.config.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), message));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        tracing::debug!(voice = voice.key, chars = text.chars().count(), bytes = audio.len(), "Speech synthesized");
        Ok(audio.to_vec())
    }

    async fn quota(&self) -> Result<VoiceQuota, SpeechError> {
        let response = self
            .client
            .get(self.quota_url())
            .header("xi-api-key", self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), message));
        }

        let usage: SubscriptionUsage = response
            .json()
            .await
            .map_err(|e| SpeechError::Parse(e.to_string()))?;

        Ok(VoiceQuota {
            used: usage.character_count,
            limit: usage.character_limit,
        })
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct SubscriptionUsage {
    character_count: u64,
    character_limit: u64,
}
