//! AI provider configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Script generation providers. Kimi is primary, DeepSeek the fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Moonshot (Kimi) API key
    pub kimi_api_key: Option<String>,

    #[serde(default = "default_kimi_model")]
    pub kimi_model: String,

    #[serde(default = "default_kimi_base_url")]
    pub kimi_base_url: String,

    /// DeepSeek API key
    pub deepseek_api_key: Option<String>,

    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,

    #[serde(default = "default_deepseek_base_url")]
    pub deepseek_base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries per provider before failing over
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Directory of markdown files appended to the system prompt
    pub knowledge_dir: Option<PathBuf>,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_kimi(&self) -> bool {
        self.kimi_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_deepseek(&self) -> bool {
        self.deepseek_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_kimi() && !self.has_deepseek() {
            return Err(ValidationError::NoAiProviderConfigured);
        }
        if !(0.0..=2.0).contains(&self.temperature) || self.max_tokens == 0 {
            return Err(ValidationError::InvalidSampling);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            kimi_api_key: None,
            kimi_model: default_kimi_model(),
            kimi_base_url: default_kimi_base_url(),
            deepseek_api_key: None,
            deepseek_model: default_deepseek_model(),
            deepseek_base_url: default_deepseek_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            knowledge_dir: None,
        }
    }
}

fn default_kimi_model() -> String {
    "moonshot-v1-8k".to_string()
}

fn default_kimi_base_url() -> String {
    "https://api.moonshot.cn/v1".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_deepseek_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    90
}

fn default_retries() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.kimi_model, "moonshot-v1-8k");
        assert_eq!(config.deepseek_model, "deepseek-chat");
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.max_retries, 1);
        assert!(config.knowledge_dir.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let config = AiConfig {
            kimi_api_key: Some(String::new()),
            deepseek_api_key: Some("sk-deepseek".to_string()),
            ..Default::default()
        };
        assert!(!config.has_kimi());
        assert!(config.has_deepseek());
    }

    #[test]
    fn test_validation_no_provider() {
        let config = AiConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::NoAiProviderConfigured)
        );
    }

    #[test]
    fn test_validation_bad_sampling() {
        let config = AiConfig {
            kimi_api_key: Some("sk-kimi".to_string()),
            temperature: 3.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSampling));
    }

    #[test]
    fn test_validation_single_provider_is_enough() {
        let config = AiConfig {
            kimi_api_key: Some("sk-kimi".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
