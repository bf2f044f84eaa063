//! LLM configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name
    ///
    /// Examples: "gpt-3.5-turbo", "gpt-4o-mini", "gpt-4o"
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens for LLM responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Optional API base URL override for OpenAI-compatible endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_base: None,
            timeout_secs: default_timeout(),
            temperature: 0.0,
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.model.is_empty() {
            return Err(ConfigError::validation(
                "llm.model",
                "Model name cannot be empty",
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::validation(
                "llm.max_tokens",
                "max_tokens must be > 0",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "llm.timeout_secs",
                "timeout_secs must be > 0",
            ));
        }

        crate::validation::validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;

        if let Some(api_base) = &self.api_base {
            crate::validation::validate_url("llm.api_base", api_base)?;
        }

        Ok(())
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(LlmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_model_invalid() {
        let config = LlmConfig {
            model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_api_base() {
        let config = LlmConfig {
            api_base: Some("not-a-url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let config = LlmConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
