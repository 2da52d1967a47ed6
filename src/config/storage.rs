//! Audio storage configuration

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `{user_id}/{file}.mp3`
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// URL prefix under which `audio_dir` is reachable
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./data/audio")
}

fn default_public_base_url() -> String {
    "/audio".to_string()
}
