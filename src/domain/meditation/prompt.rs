//! Rendering a request into model input.
//!
//! The wording of the guidance text is supplied from outside (built-in default
//! or a knowledge directory); this module only lays out the request parameters.

use super::request::MeditationRequest;

pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

const DEFAULT_SYSTEM_PROMPT: &str = "You write guided meditation scripts in Polish, \
spoken in the second person. Mark silences as [PAUZA Ns]. Match the requested length.";

/// Model input for one script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Renders requests with a fixed system text.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl PromptBuilder {
    /// Appends extra guidance (e.g. a knowledge base) to the system text.
    pub fn with_guidance(mut self, guidance: impl AsRef<str>) -> Self {
        let guidance = guidance.as_ref().trim();
        if !guidance.is_empty() {
            self.system_prompt.push_str("\n\n");
            self.system_prompt.push_str(guidance);
        }
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn render(&self, request: &MeditationRequest) -> ScriptPrompt {
        let triggers = if request.triggers().is_empty() {
            "none".to_string()
        } else {
            request.triggers().join(", ")
        };
        let user = format!(
            "Duration: {} minutes\nStress level: {}/10\nGoals: {}\nPreferred time: {}\nTriggers: {}",
            request.duration_minutes(),
            request.stress_level(),
            request.goals().join(", "),
            request.preferred_time(),
            triggers,
        );

        ScriptPrompt {
            system: self.system_prompt.clone(),
            user,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::meditation::request::MeditationRequestInput;

    fn request() -> MeditationRequest {
        MeditationRequest::try_from_input(MeditationRequestInput {
            stress_level: Some(8),
            goals: vec!["sleep".to_string(), "anxiety".to_string()],
            duration_minutes: Some(15),
            triggers: vec!["work".to_string()],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn renders_parameters_into_user_text() {
        let prompt = PromptBuilder::default().render(&request());
        assert!(prompt.user.contains("Duration: 15 minutes"));
        assert!(prompt.user.contains("Stress level: 8/10"));
        assert!(prompt.user.contains("Goals: sleep, anxiety"));
        assert!(prompt.user.contains("Triggers: work"));
        assert!(prompt.user.contains("Preferred time: anytime"));
    }

    #[test]
    fn uses_default_sampling() {
        let prompt = PromptBuilder::default().render(&request());
        assert_eq!(prompt.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(prompt.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn guidance_is_appended_to_system_text() {
        let prompt = PromptBuilder::default()
            .with_guidance("## Breath work\nSlow exhale.")
            .render(&request());
        assert!(prompt.system.starts_with(DEFAULT_SYSTEM_PROMPT));
        assert!(prompt.system.ends_with("Slow exhale."));
    }

    #[test]
    fn blank_guidance_is_ignored() {
        let builder = PromptBuilder::default().with_guidance("   ");
        assert_eq!(builder.render(&request()).system, DEFAULT_SYSTEM_PROMPT);
    }
}
