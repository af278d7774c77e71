//! LLM configuration: trait and env-based implementation.

use anyhow::{bail, Context, Result};
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_API_KEY: &str = "ollama";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn system_prompt(&self) -> Option<&str>;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_system_prompt: Option<String>,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn temperature(&self) -> f32 {
        self.llm_temperature
    }
    fn system_prompt(&self) -> Option<&str> {
        self.llm_system_prompt.as_deref()
    }
}

impl Default for EnvLlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: DEFAULT_API_KEY.to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_temperature: DEFAULT_TEMPERATURE,
            llm_system_prompt: None,
        }
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. Every variable is optional; defaults point at Ollama.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.openai_api_key);
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.openai_base_url);
        let llm_model = env::var("MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.llm_model);
        let llm_temperature = match env::var("LLM_TEMPERATURE") {
            Ok(raw) => raw
                .trim()
                .parse::<f32>()
                .with_context(|| format!("LLM_TEMPERATURE is not a number: {}", raw))?,
            Err(_) => defaults.llm_temperature,
        };
        let llm_system_prompt = env::var("LLM_SYSTEM_PROMPT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let config = Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_temperature,
            llm_system_prompt,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the base URL parses and the temperature is within the API's range.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.openai_base_url)
            .with_context(|| format!("Invalid OPENAI_BASE_URL: {}", self.openai_base_url))?;
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            bail!(
                "LLM_TEMPERATURE must be between 0 and 2, got {}",
                self.llm_temperature
            );
        }
        Ok(())
    }
}
