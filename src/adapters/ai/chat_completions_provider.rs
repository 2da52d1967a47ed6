//! OpenAI-compatible chat completions provider.
//!
//! Kimi (Moonshot) and DeepSeek both expose the `/chat/completions` contract,
//! so one adapter serves either, differing only in base URL and model.
//!
//! # Configuration
//!
//! ```ignore
//! let kimi = ChatCompletionsProvider::new(ChatCompletionsConfig::kimi(api_key));
//! let deepseek = ChatCompletionsProvider::new(
//!     ChatCompletionsConfig::deepseek(api_key).with_timeout(Duration::from_secs(90)),
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::domain::meditation::ScriptPrompt;
use crate::ports::{AIError, ScriptGenerator};

pub const KIMI_BASE_URL: &str = "https://api.moonshot.cn/v1";
pub const KIMI_MODEL: &str = "moonshot-v1-8k";
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";

/// Configuration for one chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// Provider name used in logs.
    pub name: String,
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Retries on transient failures before giving up on this provider.
    pub max_retries: u32,
}

impl ChatCompletionsConfig {
    pub fn new(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: Secret::new(api_key.into()),
            model: KIMI_MODEL.to_string(),
            base_url: KIMI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 1,
        }
    }

    /// Moonshot Kimi defaults.
    pub fn kimi(api_key: impl Into<String>) -> Self {
        Self::new("kimi", api_key)
    }

    /// DeepSeek defaults.
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new("deepseek", api_key)
            .with_model(DEEPSEEK_MODEL)
            .with_base_url(DEEPSEEK_BASE_URL)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct ChatCompletionsProvider {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsProvider {
    pub fn new(config: ChatCompletionsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_request(&self, prompt: &ScriptPrompt) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user.clone(),
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        }
    }

    async fn send_request(&self, prompt: &ScriptPrompt) -> Result<Response, AIError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.to_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<String, AIError> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), error_body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        extract_content(body)
    }

    async fn attempt(&self, prompt: &ScriptPrompt) -> Result<String, AIError> {
        let response = self.send_request(prompt).await?;
        self.parse_response(response).await
    }
}

fn classify_status(status: u16, error_body: String) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::RateLimited {
            retry_after_secs: 30,
        },
        400 => AIError::InvalidRequest(error_body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

fn extract_content(body: ChatResponse) -> Result<String, AIError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    let content = choice.message.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(AIError::EmptyCompletion);
    }
    Ok(content)
}

#[async_trait]
impl ScriptGenerator for ChatCompletionsProvider {
    async fn generate(&self, prompt: &ScriptPrompt) -> Result<String, AIError> {
        let mut retry_count = 0;
        loop {
            match self.attempt(prompt).await {
                Ok(script) => {
                    tracing::debug!(provider = %self.config.name, model = %self.config.model, chars = script.len(), "Script completed");
                    return Ok(script);
                }
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    tracing::warn!(provider = %self.config.name, error = %err, attempt = retry_count + 1, "Retrying completion");
                    // Exponential backoff: 1s, 2s, 4s, ...
                    sleep(Duration::from_secs(1 << retry_count)).await;
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prompt() -> ScriptPrompt {
        ScriptPrompt {
            system: "system text".to_string(),
            user: "user text".to_string(),
            temperature: 0.8,
            max_tokens: 4000,
        }
    }

    #[test]
    fn presets_point_at_the_right_endpoints() {
        let kimi = ChatCompletionsConfig::kimi("key");
        assert_eq!(kimi.model, "moonshot-v1-8k");
        assert_eq!(kimi.base_url, "https://api.moonshot.cn/v1");

        let deepseek = ChatCompletionsConfig::deepseek("key");
        assert_eq!(deepseek.name, "deepseek");
        assert_eq!(deepseek.model, "deepseek-chat");
        assert_eq!(
            ChatCompletionsProvider::new(deepseek).completions_url(),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn request_carries_system_and_user_messages() {
        let provider = ChatCompletionsProvider::new(ChatCompletionsConfig::kimi("key"));

        let body = serde_json::to_value(provider.to_request(&prompt())).unwrap();

        assert_eq!(body["model"], "moonshot-v1-8k");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user text");
        assert_eq!(body["max_tokens"], 4000);
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(classify_status(401, String::new()), AIError::AuthenticationFailed);
        assert!(classify_status(429, String::new()).is_retryable());
        assert!(classify_status(503, String::new()).is_retryable());
        assert!(!classify_status(400, "bad".to_string()).is_retryable());
    }

    #[test]
    fn content_is_extracted_from_first_choice() {
        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Witaj." } }]
        }))
        .unwrap();

        assert_eq!(extract_content(body).unwrap(), "Witaj.");
    }

    #[test]
    fn blank_or_missing_content_is_an_error() {
        let blank: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": "  " } }] })).unwrap();
        assert_eq!(extract_content(blank), Err(AIError::EmptyCompletion));

        let none: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(extract_content(none), Err(AIError::Parse(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_without_retry_budget() {
        let provider = ChatCompletionsProvider::new(
            ChatCompletionsConfig::kimi("key")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2))
                .with_max_retries(0),
        );

        let err = provider.generate(&prompt()).await.unwrap_err();

        assert!(err.is_retryable());
    }
}
