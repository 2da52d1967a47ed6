//! Local filesystem audio storage.
//!
//! # Directory Structure
//!
//! ```text
//! {base_path}/
//! ├── user_abc/
//! │   ├── 1735689600000.mp3
//! │   └── 1735693200000.mp3
//! └── user_xyz/
//!     └── 1735696800000.mp3
//! ```
//!
//! Files are written to `{name}.tmp`, synced, then renamed into place. The
//! HTTP layer serves `base_path` under the configured public URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::UserId;
use crate::ports::{AudioStorage, StorageError};

#[derive(Debug, Clone)]
pub struct LocalAudioStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalAudioStorage {
    pub fn new(base_path: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// A single safe path segment: no separators, no dot-only names.
fn validate_segment(segment: &str) -> Result<(), StorageError> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(segment.to_string()))
    }
}

#[async_trait]
impl AudioStorage for LocalAudioStorage {
    async fn upload(
        &self,
        user_id: &UserId,
        filename: &str,
        audio: &[u8],
    ) -> Result<String, StorageError> {
        validate_segment(user_id.as_str())?;
        validate_segment(filename)?;

        let dir = self.base_path.join(user_id.as_str());
        fs::create_dir_all(&dir).await?;

        let final_path = dir.join(filename);
        let temp_path = dir.join(format!("{}.tmp", filename));

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(audio).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &final_path).await?;

        tracing::debug!(path = %final_path.display(), bytes = audio.len(), "Audio stored");
        Ok(format!("{}/{}/{}", self.public_base_url, user_id, filename))
    }
}
