//! Failover script generator - tries providers in order until one succeeds.
//!
//! Any error from a provider moves on to the next one; the last error is
//! returned when every provider failed.
//!
//! # Example
//!
//! ```ignore
//! let generator = FailoverGenerator::new(Arc::new(kimi))
//!     .with_fallback(Arc::new(deepseek));
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::meditation::ScriptPrompt;
use crate::ports::{AIError, ScriptGenerator};

pub struct FailoverGenerator {
    providers: Vec<Arc<dyn ScriptGenerator>>,
}

impl FailoverGenerator {
    pub fn new(primary: Arc<dyn ScriptGenerator>) -> Self {
        Self {
            providers: vec![primary],
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ScriptGenerator>) -> Self {
        self.providers.push(fallback);
        self
    }
}

#[async_trait]
impl ScriptGenerator for FailoverGenerator {
    async fn generate(&self, prompt: &ScriptPrompt) -> Result<String, AIError> {
        let mut last_error = AIError::unavailable("no script generator configured");

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.generate(prompt).await {
                Ok(script) => {
                    if index > 0 {
                        tracing::info!(provider = provider.name(), "Fallback generator succeeded");
                    }
                    return Ok(script);
                }
                Err(err) => {
                    tracing::warn!(provider = provider.name(), error = %err, "Script generator failed");
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }

    fn name(&self) -> &str {
        self.providers
            .first()
            .map(|p| p.name())
            .unwrap_or("failover")
    }
}
