//! Meditation generation errors.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Error)]
pub enum MeditationError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Every script generator failed.
    #[error("Script generation failed: {0}")]
    GenerationFailed(String),
}
