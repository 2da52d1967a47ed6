//! Validated generation request.

use super::voice::{Voice, DEFAULT_VOICE_KEY};
use crate::domain::foundation::{UserId, ValidationError};

pub const DEFAULT_STRESS_LEVEL: i32 = 5;
pub const DEFAULT_DURATION_MINUTES: i32 = 10;
pub const DEFAULT_PREFERRED_TIME: &str = "anytime";
pub const MAX_DURATION_MINUTES: i32 = 60;

/// Unvalidated input as received from the client.
#[derive(Debug, Clone, Default)]
pub struct MeditationRequestInput {
    pub stress_level: Option<i32>,
    pub goals: Vec<String>,
    pub duration_minutes: Option<i32>,
    pub preferred_time: Option<String>,
    pub triggers: Vec<String>,
    pub voice: Option<String>,
    pub user_id: Option<String>,
}

/// Parameters for one personalized meditation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeditationRequest {
    stress_level: i32,
    goals: Vec<String>,
    duration_minutes: i32,
    preferred_time: String,
    triggers: Vec<String>,
    voice_key: String,
    user_id: Option<UserId>,
}

impl MeditationRequest {
    /// Applies defaults and validates the input.
    ///
    /// Only the goals are mandatory. A non-positive duration falls back to the
    /// default and longer ones are capped at `MAX_DURATION_MINUTES`. The voice
    /// is resolved lazily, since it only matters for audio.
    ///
    /// # Errors
    ///
    /// `EmptyField("goals")` when no non-blank goal is given.
    pub fn try_from_input(input: MeditationRequestInput) -> Result<Self, ValidationError> {
        let goals: Vec<String> = input
            .goals
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if goals.is_empty() {
            return Err(ValidationError::empty_field("goals"));
        }

        let duration_minutes = input
            .duration_minutes
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
            .min(MAX_DURATION_MINUTES);

        let voice_key = input
            .voice
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VOICE_KEY.to_string());

        let user_id = match input.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(UserId::new(id)?),
            _ => None,
        };

        Ok(Self {
            stress_level: input
                .stress_level
                .unwrap_or(DEFAULT_STRESS_LEVEL)
                .clamp(1, 10),
            goals,
            duration_minutes,
            preferred_time: input
                .preferred_time
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PREFERRED_TIME.to_string()),
            triggers: input.triggers,
            voice_key,
            user_id,
        })
    }

    pub fn stress_level(&self) -> i32 {
        self.stress_level
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    /// First goal; drives the theme and title.
    pub fn primary_goal(&self) -> &str {
        &self.goals[0]
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn duration_seconds(&self) -> i32 {
        self.duration_minutes * 60
    }

    pub fn preferred_time(&self) -> &str {
        &self.preferred_time
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Voice key as requested, possibly not in the catalogue.
    pub fn voice_key(&self) -> &str {
        &self.voice_key
    }

    /// Catalogue entry for the requested voice, if it exists.
    pub fn voice(&self) -> Option<&'static Voice> {
        Voice::find(&self.voice_key)
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}
