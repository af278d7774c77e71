//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

/// Ollama's default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_API_KEY: &str = "ollama";

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn model(&self) -> &str;
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_model: String,
    pub api_key: String,
    pub base_url: String,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn model(&self) -> &str {
        &self.embedding_model
    }
    fn api_key(&self) -> &str {
        &self.api_key
    }
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn non_blank(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    ///
    /// `EMBEDDING_API_KEY` / `EMBEDDING_BASE_URL` fall back to `OPENAI_API_KEY` / `OPENAI_BASE_URL`,
    /// then to the local Ollama endpoint.
    pub fn from_env() -> Result<Self> {
        let embedding_model =
            non_blank("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let api_key = non_blank("EMBEDDING_API_KEY")
            .or_else(|| non_blank("OPENAI_API_KEY"))
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let base_url = non_blank("EMBEDDING_BASE_URL")
            .or_else(|| non_blank("OPENAI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            embedding_model,
            api_key,
            base_url,
        })
    }
}
