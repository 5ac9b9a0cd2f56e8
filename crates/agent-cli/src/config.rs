//! Client settings read from the environment

use agent_runtime::ExecutorConfig;
use agent_utils::{ConfigError, env_or, env_parse};

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_MAX_TOKENS: usize = 5000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. If a tool call fails, \
do not give up: try another approach before answering the user.\n\n\
Always be helpful and explain what you are doing.";

/// LLM settings of the chat client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `LLM_MODEL`, `LLM_MAX_TOKENS`, `LLM_TEMPERATURE` and `LLM_SYSTEM_PROMPT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            model: env_or("LLM_MODEL", DEFAULT_MODEL),
            max_tokens: env_parse("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            temperature: env_parse("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            system_prompt: env_or("LLM_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        })
    }

    pub fn executor_config(&self, max_iterations: usize) -> ExecutorConfig {
        ExecutorConfig {
            max_iterations,
            model: self.model.clone(),
            system_prompt: Some(self.system_prompt.clone()),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("LLM_MODEL", "local-model");
            std::env::set_var("LLM_MAX_TOKENS", "256");
        }
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.model, "local-model");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);

        unsafe {
            std::env::set_var("LLM_MAX_TOKENS", "lots");
        }
        let error = ClientConfig::from_env().unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { ref key, .. } if key == "LLM_MAX_TOKENS"));

        unsafe {
            std::env::remove_var("LLM_MODEL");
            std::env::remove_var("LLM_MAX_TOKENS");
        }
    }

    #[test]
    fn test_executor_config() {
        let executor = ClientConfig::default().executor_config(4);
        assert_eq!(executor.max_iterations, 4);
        assert_eq!(executor.model, "gpt-4.1");
        assert_eq!(executor.max_tokens, 5000);
        assert_eq!(executor.temperature, Some(0.1));
        assert!(executor.system_prompt.is_some());
    }
}
