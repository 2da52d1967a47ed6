//! Generated meditation entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MeditationId, Timestamp, UserId};

/// Language of generated scripts.
pub const SCRIPT_LANGUAGE: &str = "pl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meditation {
    pub id: MeditationId,
    /// Owner; anonymous generations are never persisted.
    pub user_id: Option<UserId>,
    pub title: String,
    pub script: String,
    pub audio_url: Option<String>,
    pub duration_seconds: i32,
    pub theme: String,
    pub language: String,
    pub created_at: Timestamp,
}

impl Meditation {
    pub fn is_persistable(&self) -> bool {
        self.user_id.is_some()
    }
}
