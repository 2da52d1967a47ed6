//! Mock script generator for testing.
//!
//! Responses are consumed in order; once the queue is empty the generator
//! keeps returning its default script.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::meditation::ScriptPrompt;
use crate::ports::{AIError, ScriptGenerator};

const DEFAULT_SCRIPT: &str = "Usiadz wygodnie. [PAUZA 3s] Oddychaj spokojnie.";

#[derive(Debug, Clone)]
pub struct MockScriptGenerator {
    name: String,
    responses: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    calls: Arc<Mutex<Vec<ScriptPrompt>>>,
}

impl MockScriptGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, script: impl Into<String>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(Ok(script.into()));
        }
        self
    }

    pub fn with_error(self, error: AIError) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(Err(error));
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Prompts received so far.
    pub fn calls(&self) -> Vec<ScriptPrompt> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ScriptGenerator for MockScriptGenerator {
    async fn generate(&self, prompt: &ScriptPrompt) -> Result<String, AIError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.clone());
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .unwrap_or_else(|| Ok(DEFAULT_SCRIPT.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> ScriptPrompt {
        ScriptPrompt {
            system: "s".to_string(),
            user: "u".to_string(),
            temperature: 0.8,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order_then_default() {
        let mock = MockScriptGenerator::new("mock")
            .with_error(AIError::EmptyCompletion)
            .with_response("second");

        assert!(mock.generate(&prompt()).await.is_err());
        assert_eq!(mock.generate(&prompt()).await.unwrap(), "second");
        assert_eq!(mock.generate(&prompt()).await.unwrap(), DEFAULT_SCRIPT);
        assert_eq!(mock.call_count(), 3);
    }
}
