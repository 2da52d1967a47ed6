//! Audio storage port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;

#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Stores audio under the user's namespace and returns its public URL.
    async fn upload(
        &self,
        user_id: &UserId,
        filename: &str,
        audio: &[u8],
    ) -> Result<String, StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
