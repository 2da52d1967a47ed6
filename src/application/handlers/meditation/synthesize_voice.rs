//! Voice handlers - direct text-to-speech and the voice catalogue.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::meditation::{prepare_for_speech, Voice, VoiceSettings, DEFAULT_VOICE_KEY};
use crate::ports::{SpeechError, SpeechSynthesizer, VoiceQuota};

/// Command to synthesize arbitrary text.
#[derive(Debug, Clone)]
pub struct SynthesizeVoiceCommand {
    pub text: String,
    /// Catalogue key; the default voice when absent.
    pub voice_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum SynthesizeVoiceError {
    #[error("Text is required")]
    TextRequired,

    #[error("Invalid voice ID")]
    UnknownVoice(String),

    #[error("Voice synthesis failed: {0}")]
    Synthesis(#[from] SpeechError),
}

/// Handler for text-to-speech requests.
pub struct SynthesizeVoiceHandler {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SynthesizeVoiceHandler {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }

    /// Returns MPEG audio bytes.
    pub async fn handle(&self, cmd: SynthesizeVoiceCommand) -> Result<Vec<u8>, SynthesizeVoiceError> {
        if cmd.text.trim().is_empty() {
            return Err(SynthesizeVoiceError::TextRequired);
        }

        let key = cmd.voice_key.as_deref().unwrap_or(DEFAULT_VOICE_KEY);
        let voice =
            Voice::find(key).ok_or_else(|| SynthesizeVoiceError::UnknownVoice(key.to_string()))?;

        let audio = self
            .synthesizer
            .synthesize(&prepare_for_speech(&cmd.text), voice, VoiceSettings::default())
            .await
            .map_err(|e| {
                tracing::error!(voice = voice.key, error = %e, "Voice synthesis failed");
                e
            })?;

        tracing::debug!(voice = voice.key, bytes = audio.len(), "Voice synthesized");
        Ok(audio)
    }
}

/// Voice catalogue with the provider's current quota.
#[derive(Debug)]
pub struct VoiceCatalogue {
    pub voices: &'static [Voice],
    /// `None` when synthesis is not configured or the quota lookup failed.
    pub quota: Option<VoiceQuota>,
    pub default_voice: &'static str,
}

/// Query handler listing voices.
pub struct ListVoicesHandler {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl ListVoicesHandler {
    pub fn new(synthesizer: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        Self { synthesizer }
    }

    /// Never fails; a quota error only drops the quota.
    pub async fn handle(&self) -> VoiceCatalogue {
        let quota = match &self.synthesizer {
            Some(synthesizer) => match synthesizer.quota().await {
                Ok(quota) => Some(quota),
                Err(e) => {
                    tracing::warn!(error = %e, "Voice quota lookup failed");
                    None
                }
            },
            None => None,
        };

        VoiceCatalogue {
            voices: Voice::all(),
            quota,
            default_voice: DEFAULT_VOICE_KEY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockSynthesizer {
        calls: Mutex<Vec<(String, &'static str)>>,
        fail: bool,
    }

    impl MockSynthesizer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            voice: &Voice,
            _settings: VoiceSettings,
        ) -> Result<Vec<u8>, SpeechError> {
            self.calls.lock().unwrap().push((text.to_string(), voice.key));
            if self.fail {
                return Err(SpeechError::AuthenticationFailed);
            }
            Ok(b"ID3".to_vec())
        }

        async fn quota(&self) -> Result<VoiceQuota, SpeechError> {
            if self.fail {
                return Err(SpeechError::Network("unreachable".to_string()));
            }
            Ok(VoiceQuota {
                used: 1_200,
                limit: 10_000,
            })
        }
    }

    fn command(text: &str, voice: Option<&str>) -> SynthesizeVoiceCommand {
        SynthesizeVoiceCommand {
            text: text.to_string(),
            voice_key: voice.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn synthesizes_with_default_voice() {
        let synthesizer = Arc::new(MockSynthesizer::new());
        let handler = SynthesizeVoiceHandler::new(synthesizer.clone());

        let audio = handler.handle(command("Spokojny oddech", None)).await.unwrap();

        assert_eq!(audio, b"ID3".to_vec());
        assert_eq!(synthesizer.calls.lock().unwrap()[0].1, "bella");
    }

    #[tokio::test]
    async fn pause_markers_are_rendered_before_synthesis() {
        let synthesizer = Arc::new(MockSynthesizer::new());
        let handler = SynthesizeVoiceHandler::new(synthesizer.clone());

        handler.handle(command("Raz [PAUZA 2s] dwa", Some("adam"))).await.unwrap();

        let calls = synthesizer.calls.lock().unwrap();
        assert_eq!(calls[0], ("Raz .. dwa".to_string(), "adam"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let synthesizer = Arc::new(MockSynthesizer::new());
        let handler = SynthesizeVoiceHandler::new(synthesizer.clone());

        let err = handler.handle(command("   ", None)).await.unwrap_err();

        assert!(matches!(err, SynthesizeVoiceError::TextRequired));
        assert!(synthesizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_voice_is_rejected() {
        let handler = SynthesizeVoiceHandler::new(Arc::new(MockSynthesizer::new()));

        let err = handler.handle(command("text", Some("hal9000"))).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid voice ID");
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let handler = SynthesizeVoiceHandler::new(Arc::new(MockSynthesizer::failing()));

        let err = handler.handle(command("text", None)).await.unwrap_err();

        assert!(matches!(err, SynthesizeVoiceError::Synthesis(_)));
    }

    #[tokio::test]
    async fn catalogue_includes_quota_when_available() {
        let handler = ListVoicesHandler::new(Some(Arc::new(MockSynthesizer::new())));

        let catalogue = handler.handle().await;

        assert_eq!(catalogue.voices.len(), 9);
        assert_eq!(catalogue.default_voice, "bella");
        assert_eq!(catalogue.quota.map(|q| q.remaining()), Some(8_800));
    }

    #[tokio::test]
    async fn catalogue_without_quota_when_lookup_fails_or_unconfigured() {
        let failing = ListVoicesHandler::new(Some(Arc::new(MockSynthesizer::failing())));
        assert!(failing.handle().await.quota.is_none());

        let unconfigured = ListVoicesHandler::new(None);
        let catalogue = unconfigured.handle().await;
        assert!(catalogue.quota.is_none());
        assert_eq!(catalogue.voices.len(), 9);
    }
}
