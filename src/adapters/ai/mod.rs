//! Script generator adapters.
//!
//! - `ChatCompletionsProvider` - Kimi or DeepSeek over the OpenAI-compatible API
//! - `FailoverGenerator` - ordered fallback across providers
//! - `MockScriptGenerator` - queued responses for tests

mod chat_completions_provider;
mod failover_provider;
mod mock_provider;

pub use chat_completions_provider::{
    ChatCompletionsConfig, ChatCompletionsProvider, DEEPSEEK_BASE_URL, DEEPSEEK_MODEL,
    KIMI_BASE_URL, KIMI_MODEL,
};
pub use failover_provider::FailoverGenerator;
pub use mock_provider::MockScriptGenerator;
