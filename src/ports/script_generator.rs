//! Script generator port - language model completion for meditation scripts.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::meditation::ScriptPrompt;

/// Port for language model providers.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generates a script for the prompt.
    async fn generate(&self, prompt: &ScriptPrompt) -> Result<String, AIError>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

/// Errors from language model providers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered but produced no text.
    #[error("empty completion")]
    EmptyCompletion,

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn network(message: impl Into<String>) -> Self {
        AIError::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        AIError::Parse(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        AIError::Unavailable {
            message: message.into(),
        }
    }

    /// Returns true if retrying the same provider may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
