//! [`LlmClient`] over openai-client: prepends the configured system prompt and applies temperature.

use anyhow::Result;
use async_trait::async_trait;
use prompt::{ChatMessage, MessageRole};
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, LlmConfig};

/// LlmClient backed by an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    temperature: Option<f32>,
    system_prompt: Option<String>,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(api_key),
            model: super::config::DEFAULT_MODEL.to_string(),
            temperature: None,
            system_prompt: None,
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: super::config::DEFAULT_MODEL.to_string(),
            temperature: None,
            system_prompt: None,
        }
    }

    /// Builds a client from any [`LlmConfig`] (base URL, key, model, temperature, system prompt).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_temperature(config.temperature())
            .with_system_prompt_opt(config.system_prompt().map(str::to_string))
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request messages: configured system prompt first unless the caller already supplied one.
    fn request_messages(&self, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let has_system = messages.iter().any(|m| m.role == MessageRole::System);
        match self.system_prompt.as_deref() {
            Some(system) if !has_system => {
                let mut out = Vec::with_capacity(messages.len() + 1);
                out.push(ChatMessage::system(system));
                out.extend(messages);
                out
            }
            _ => messages,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = self
            .request_messages(messages)
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client
            .chat_completion(&self.model, openai_messages, self.temperature)
            .await
    }
}
