//! GenerateMeditationHandler - produces a personalized script, optional audio,
//! and persists the result for signed-in users.

use std::sync::Arc;

use crate::domain::foundation::{MeditationId, Timestamp};
use crate::domain::meditation::{
    pick_title, prepare_for_speech, Meditation, MeditationError, MeditationRequest,
    MeditationRequestInput, PromptBuilder, VoiceSettings, SCRIPT_LANGUAGE,
};
use crate::ports::{AudioStorage, MeditationRepository, ScriptGenerator, SpeechSynthesizer};

/// Command to generate one meditation.
#[derive(Debug, Clone)]
pub struct GenerateMeditationCommand {
    pub input: MeditationRequestInput,
}

/// Optional audio pipeline. Audio is only produced when both halves exist.
#[derive(Clone)]
pub struct AudioPipeline {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub storage: Arc<dyn AudioStorage>,
}

/// Handler for meditation generation.
pub struct GenerateMeditationHandler {
    generator: Arc<dyn ScriptGenerator>,
    prompts: PromptBuilder,
    audio: Option<AudioPipeline>,
    repository: Option<Arc<dyn MeditationRepository>>,
}

impl GenerateMeditationHandler {
    pub fn new(generator: Arc<dyn ScriptGenerator>, prompts: PromptBuilder) -> Self {
        Self {
            generator,
            prompts,
            audio: None,
            repository: None,
        }
    }

    /// Enables audio synthesis for generated scripts.
    pub fn with_audio(mut self, audio: AudioPipeline) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn MeditationRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub async fn handle(
        &self,
        cmd: GenerateMeditationCommand,
    ) -> Result<Meditation, MeditationError> {
        let request = MeditationRequest::try_from_input(cmd.input)?;

        let prompt = self.prompts.render(&request);
        let script = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(generator = self.generator.name(), error = %e, "Script generation failed");
            MeditationError::GenerationFailed(e.to_string())
        })?;

        let audio_url = self.produce_audio(&request, &script).await;

        let title = pick_title(request.primary_goal(), &mut rand::thread_rng());
        let meditation = Meditation {
            id: MeditationId::new(),
            user_id: request.user_id().cloned(),
            title: title.to_string(),
            script,
            audio_url,
            duration_seconds: request.duration_seconds(),
            theme: request.primary_goal().to_string(),
            language: SCRIPT_LANGUAGE.to_string(),
            created_at: Timestamp::now(),
        };

        if meditation.is_persistable() {
            self.save(&meditation).await;
        }

        tracing::info!(
            meditation_id = %meditation.id,
            theme = %meditation.theme,
            has_audio = meditation.audio_url.is_some(),
            "Meditation generated"
        );
        Ok(meditation)
    }

    /// Saves to history. A failed save is logged; the caller still gets the
    /// generated meditation.
    async fn save(&self, meditation: &Meditation) {
        let Some(repository) = &self.repository else {
            tracing::warn!(meditation_id = %meditation.id, "No meditation store configured; result not saved");
            return;
        };
        if let Err(e) = repository.save(meditation).await {
            tracing::error!(meditation_id = %meditation.id, error = %e, "Failed to save meditation");
        }
    }

    /// Synthesizes and uploads audio. Failures are logged and yield `None`.
    async fn produce_audio(&self, request: &MeditationRequest, script: &str) -> Option<String> {
        let audio = self.audio.as_ref()?;

        let Some(voice) = request.voice() else {
            tracing::warn!(voice = request.voice_key(), "Unknown voice; continuing without audio");
            return None;
        };

        let bytes = match audio
            .synthesizer
            .synthesize(&prepare_for_speech(script), voice, VoiceSettings::default())
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Audio synthesis failed; continuing without audio");
                return None;
            }
        };

        // Anonymous audio has nowhere to live.
        let user_id = request.user_id()?;
        let filename = format!("{}.mp3", Timestamp::now().as_unix_millis());
        match audio.storage.upload(user_id, &filename, &bytes).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Audio upload failed; continuing without audio");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, UserId, ValidationError};
    use crate::domain::meditation::{titles_for, ScriptPrompt, Voice};
    use crate::ports::{AIError, SpeechError, StorageError, VoiceQuota};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockGenerator {
        result: Result<String, AIError>,
        prompts: Mutex<Vec<ScriptPrompt>>,
    }

    impl MockGenerator {
        fn returning(script: &str) -> Self {
            Self {
                result: Ok(script.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(AIError::unavailable("both providers down")),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ScriptGenerator for MockGenerator {
        async fn generate(&self, prompt: &ScriptPrompt) -> Result<String, AIError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.result.clone()
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct MockSynthesizer {
        fail: bool,
        texts: Mutex<Vec<(String, &'static str)>>,
    }

    impl MockSynthesizer {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                texts: Mutex::new(Vec::new()),
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
            self.texts.lock().unwrap().push((text.to_string(), voice.id));
            if self.fail {
                return Err(SpeechError::QuotaExceeded);
            }
            Ok(vec![0xFF, 0xFB])
        }

        async fn quota(&self) -> Result<VoiceQuota, SpeechError> {
            Ok(VoiceQuota { used: 0, limit: 10_000 })
        }
    }

    #[derive(Default)]
    struct MockStorage {
        uploads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AudioStorage for MockStorage {
        async fn upload(
            &self,
            user_id: &UserId,
            filename: &str,
            _audio: &[u8],
        ) -> Result<String, StorageError> {
            let path = format!("{}/{}", user_id, filename);
            self.uploads.lock().unwrap().push(path.clone());
            Ok(format!("http://localhost/audio/{}", path))
        }
    }

    #[derive(Default)]
    struct MockRepository {
        saved: Mutex<Vec<Meditation>>,
        fail: bool,
    }

    #[async_trait]
    impl MeditationRepository for MockRepository {
        async fn save(&self, meditation: &Meditation) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::database("insert failed"));
            }
            self.saved.lock().unwrap().push(meditation.clone());
            Ok(())
        }

        async fn list_recent(
            &self,
            _user_id: &UserId,
            _limit: u32,
        ) -> Result<Vec<Meditation>, DomainError> {
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn input(user_id: Option<&str>) -> MeditationRequestInput {
        MeditationRequestInput {
            goals: vec!["sleep".to_string()],
            duration_minutes: Some(12),
            user_id: user_id.map(str::to_string),
            ..Default::default()
        }
    }

    fn command(user_id: Option<&str>) -> GenerateMeditationCommand {
        GenerateMeditationCommand {
            input: input(user_id),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn anonymous_generation_returns_script_without_saving() {
        let repository = Arc::new(MockRepository::default());
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("Oddychaj. [PAUZA 5s]")),
            PromptBuilder::default(),
        )
        .with_repository(repository.clone());

        let meditation = handler.handle(command(None)).await.unwrap();

        assert_eq!(meditation.script, "Oddychaj. [PAUZA 5s]");
        assert_eq!(meditation.duration_seconds, 720);
        assert_eq!(meditation.theme, "sleep");
        assert_eq!(meditation.language, "pl");
        assert!(titles_for("sleep").contains(&meditation.title.as_str()));
        assert!(meditation.audio_url.is_none());
        assert!(repository.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signed_in_generation_is_saved() {
        let repository = Arc::new(MockRepository::default());
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("script")),
            PromptBuilder::default(),
        )
        .with_repository(repository.clone());

        let meditation = handler.handle(command(Some("u1"))).await.unwrap();

        let saved = repository.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, meditation.id);
        assert_eq!(saved[0].user_id.as_ref().map(UserId::as_str), Some("u1"));
    }

    #[tokio::test]
    async fn save_failure_still_returns_meditation() {
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("script")),
            PromptBuilder::default(),
        )
        .with_repository(Arc::new(MockRepository {
            fail: true,
            ..Default::default()
        }));

        let meditation = handler.handle(command(Some("u1"))).await.unwrap();

        assert_eq!(meditation.script, "script");
        assert_eq!(meditation.user_id.as_ref().map(UserId::as_str), Some("u1"));
    }

    #[tokio::test]
    async fn missing_goals_are_rejected_before_generation() {
        let generator = Arc::new(MockGenerator::returning("script"));
        let handler = GenerateMeditationHandler::new(generator.clone(), PromptBuilder::default());

        let result = handler
            .handle(GenerateMeditationCommand {
                input: MeditationRequestInput::default(),
            })
            .await;

        assert!(matches!(
            result,
            Err(MeditationError::Validation(ValidationError::EmptyField { .. }))
        ));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generator_failure_maps_to_generation_failed() {
        let handler =
            GenerateMeditationHandler::new(Arc::new(MockGenerator::failing()), PromptBuilder::default());

        let result = handler.handle(command(None)).await;

        assert!(matches!(result, Err(MeditationError::GenerationFailed(_))));
    }

    #[tokio::test]
    async fn audio_is_synthesized_from_prepared_script_and_uploaded() {
        let synthesizer = Arc::new(MockSynthesizer::new(false));
        let storage = Arc::new(MockStorage::default());
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("Wdech [PAUZA 3s] wydech")),
            PromptBuilder::default(),
        )
        .with_audio(AudioPipeline {
            synthesizer: synthesizer.clone(),
            storage: storage.clone(),
        });

        let meditation = handler.handle(command(Some("u1"))).await.unwrap();

        let texts = synthesizer.texts.lock().unwrap();
        assert_eq!(texts[0].0, "Wdech ... wydech");
        assert_eq!(texts[0].1, Voice::default_voice().id);
        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].starts_with("u1/") && uploads[0].ends_with(".mp3"));
        assert!(meditation.audio_url.unwrap().ends_with(".mp3"));
    }

    #[tokio::test]
    async fn anonymous_audio_is_not_uploaded() {
        let storage = Arc::new(MockStorage::default());
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("script")),
            PromptBuilder::default(),
        )
        .with_audio(AudioPipeline {
            synthesizer: Arc::new(MockSynthesizer::new(false)),
            storage: storage.clone(),
        });

        let meditation = handler.handle(command(None)).await.unwrap();

        assert!(meditation.audio_url.is_none());
        assert!(storage.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_voice_skips_audio_but_returns_script() {
        let synthesizer = Arc::new(MockSynthesizer::new(false));
        let storage = Arc::new(MockStorage::default());
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("script")),
            PromptBuilder::default(),
        )
        .with_audio(AudioPipeline {
            synthesizer: synthesizer.clone(),
            storage: storage.clone(),
        });
        let mut raw = input(Some("u1"));
        raw.voice = Some("nova".to_string());

        let meditation = handler
            .handle(GenerateMeditationCommand { input: raw })
            .await
            .unwrap();

        assert_eq!(meditation.script, "script");
        assert!(meditation.audio_url.is_none());
        assert!(synthesizer.texts.lock().unwrap().is_empty());
        assert!(storage.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn synthesis_failure_still_returns_script() {
        let handler = GenerateMeditationHandler::new(
            Arc::new(MockGenerator::returning("script")),
            PromptBuilder::default(),
        )
        .with_audio(AudioPipeline {
            synthesizer: Arc::new(MockSynthesizer::new(true)),
            storage: Arc::new(MockStorage::default()),
        });

        let meditation = handler.handle(command(Some("u1"))).await.unwrap();

        assert_eq!(meditation.script, "script");
        assert!(meditation.audio_url.is_none());
    }
}
