//! HTTP DTOs for meditation and voice endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::meditation::VoiceCatalogue;
use crate::domain::meditation::{Meditation, MeditationRequestInput, Voice};
use crate::ports::VoiceQuota;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/generate`. Everything but `goals` has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub stress_level: Option<i32>,
    #[serde(default)]
    pub goals: Vec<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<GenerateRequest> for MeditationRequestInput {
    fn from(req: GenerateRequest) -> Self {
        Self {
            stress_level: req.stress_level,
            goals: req.goals,
            duration_minutes: req.duration,
            preferred_time: req.preferred_time,
            triggers: req.triggers,
            voice: req.voice_id,
            user_id: req.user_id,
        }
    }
}

/// Body of `POST /api/voice`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationResponse {
    pub id: String,
    pub title: String,
    pub script: String,
    pub audio_url: Option<String>,
    /// Seconds.
    pub duration: i32,
    pub theme: String,
}

impl From<&Meditation> for MeditationResponse {
    fn from(m: &Meditation) -> Self {
        Self {
            id: m.id.to_string(),
            title: m.title.clone(),
            script: m.script.clone(),
            audio_url: m.audio_url.clone(),
            duration: m.duration_seconds,
            theme: m.theme.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub meditation: MeditationResponse,
}

/// One entry of a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationHistoryItem {
    #[serde(flatten)]
    pub meditation: MeditationResponse,
    pub language: String,
    pub created_at: String,
}

impl From<&Meditation> for MeditationHistoryItem {
    fn from(m: &Meditation) -> Self {
        Self {
            meditation: MeditationResponse::from(m),
            language: m.language.clone(),
            created_at: m.created_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationListResponse {
    pub meditations: Vec<MeditationHistoryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    pub key: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub description: &'static str,
}

impl From<&'static Voice> for VoiceResponse {
    fn from(v: &'static Voice) -> Self {
        Self {
            key: v.key,
            id: v.id,
            name: v.name,
            gender: v.gender,
            description: v.description,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaResponse {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
}

impl From<VoiceQuota> for QuotaResponse {
    fn from(q: VoiceQuota) -> Self {
        Self {
            used: q.used,
            limit: q.limit,
            remaining: q.remaining(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceResponse>,
    pub quota: Option<QuotaResponse>,
    pub default_voice: &'static str,
}

impl From<VoiceCatalogue> for VoiceListResponse {
    fn from(catalogue: VoiceCatalogue) -> Self {
        Self {
            voices: catalogue.voices.iter().map(VoiceResponse::from).collect(),
            quota: catalogue.quota.map(QuotaResponse::from),
            default_voice: catalogue.default_voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_request_reads_camel_case_and_defaults() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "goals": ["sleep"],
            "stressLevel": 7,
            "voiceId": "adam"
        }))
        .unwrap();

        assert_eq!(req.stress_level, Some(7));
        assert_eq!(req.voice_id.as_deref(), Some("adam"));
        assert!(req.duration.is_none());
        assert!(req.triggers.is_empty());
    }

    #[test]
    fn quota_response_includes_remaining() {
        let json = serde_json::to_value(QuotaResponse::from(VoiceQuota {
            used: 100,
            limit: 1000,
        }))
        .unwrap();

        assert_eq!(json, json!({ "used": 100, "limit": 1000, "remaining": 900 }));
    }
}
