//! Speech synthesizer port.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::meditation::{Voice, VoiceSettings};

/// Character quota reported by the synthesis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceQuota {
    pub used: u64,
    pub limit: u64,
}

impl VoiceQuota {
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes `text` and returns MPEG audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        settings: VoiceSettings,
    ) -> Result<Vec<u8>, SpeechError>;

    /// Current character usage.
    async fn quota(&self) -> Result<VoiceQuota, SpeechError>;
}

#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("character quota exceeded")]
    QuotaExceeded,

    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}
