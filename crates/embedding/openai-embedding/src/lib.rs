//! # OpenAI-compatible embedding service
//!
//! [`EmbeddingService`] over the `/embeddings` endpoint of any OpenAI-compatible server. The default
//! setup talks to a local Ollama (`nomic-embed-text`); pointing the base URL at OpenAI works the
//! same way with e.g. `text-embedding-3-small`.
//!
//! Every request is bounded by a timeout; a response whose item count differs from the input count
//! is an error.

use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
/// Batch requests carry whole documents, so they get more time.
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Embedding service holding the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates a service against the default OpenAI endpoint.
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a service against a custom OpenAI-compatible endpoint when `base_url` is set.
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }
        Self {
            client: Client::with_config(openai_config),
            model,
        }
    }

    /// Creates a service from an [`EmbeddingConfig`] (model, key, base URL).
    pub fn from_config(config: &dyn EmbeddingConfig) -> Self {
        Self::new_with_base_url(
            config.api_key().to_string(),
            config.model().to_string(),
            Some(config.base_url()),
        )
    }

    /// Returns the embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, inputs: Vec<String>, timeout: Duration) -> anyhow::Result<Vec<Vec<f32>>> {
        let expected = inputs.len();
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(inputs)
            .build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(r)) => {
                debug!("embedding response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "embedding request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "embedding request timed out");
                anyhow::bail!(
                    "Embedding request timed out after {} seconds",
                    timeout.as_secs()
                );
            }
        };

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();
        if vectors.len() != expected {
            warn!(
                expected,
                got = vectors.len(),
                "embedding response count mismatch"
            );
            anyhow::bail!("Expected {} embeddings, got {}", expected, vectors.len());
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(model = %self.model, "step: embedding embed request");
        let mut vectors = self.request(vec![text.to_string()], EMBED_TIMEOUT).await?;
        let embedding = vectors.pop().unwrap_or_default();
        info!(dimension = embedding.len(), "step: embedding embed done");
        Ok(embedding)
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("embed_batch empty input, skipping");
            return Ok(vec![]);
        }
        info!(
            model = %self.model,
            batch_size = texts.len(),
            "step: embedding embed_batch request"
        );
        let vectors = self.request(texts.to_vec(), EMBED_BATCH_TIMEOUT).await?;
        info!(
            count = vectors.len(),
            dimension = vectors.first().map(|v| v.len()).unwrap_or(0),
            "step: embedding embed_batch done"
        );
        Ok(vectors)
    }
}
