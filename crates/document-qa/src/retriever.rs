//! Indexing a document file into a [`Retriever`].

use crate::error::DocumentError;
use crate::loader::load_text;
use crate::passages::{split_passages, Passage, DEFAULT_PASSAGE_OVERLAP, DEFAULT_PASSAGE_SIZE};
use crate::store::InMemoryVectorStore;
use anyhow::{Context, Result};
use embedding::EmbeddingService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

pub const DEFAULT_TOP_K: usize = 3;

/// Builds retrievers from files: extract text, split into passages, embed, store.
#[derive(Clone)]
pub struct DocumentIndexer {
    embedder: Arc<dyn EmbeddingService>,
    top_k: usize,
    passage_size: usize,
    passage_overlap: usize,
}

impl DocumentIndexer {
    pub fn new(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedder,
            top_k: DEFAULT_TOP_K,
            passage_size: DEFAULT_PASSAGE_SIZE,
            passage_overlap: DEFAULT_PASSAGE_OVERLAP,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_passage_size(mut self, size: usize, overlap: usize) -> Self {
        self.passage_size = size;
        self.passage_overlap = overlap;
        self
    }

    /// Indexes the file at `path`. Unsupported types and empty documents fail with a
    /// [`DocumentError`] in the error chain.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn index(&self, path: &Path) -> Result<Retriever> {
        let owned: PathBuf = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || load_text(&owned))
            .await
            .context("document loader task failed")??;
        self.index_text(&text).await
    }

    /// Indexes already extracted text.
    pub async fn index_text(&self, text: &str) -> Result<Retriever> {
        if text.trim().is_empty() {
            return Err(DocumentError::Empty.into());
        }
        let passages = split_passages(text, self.passage_size, self.passage_overlap);
        info!(passages = passages.len(), "step: document split into passages");

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .context("failed to embed document passages")?;

        let store = InMemoryVectorStore::new();
        store.add(passages, embeddings).await;
        let stored = store.len().await;
        info!(stored, "step: document vector store ready");

        Ok(Retriever {
            store,
            embedder: self.embedder.clone(),
            top_k: self.top_k,
        })
    }
}

/// Similarity search over one indexed document.
#[derive(Clone)]
pub struct Retriever {
    store: InMemoryVectorStore,
    embedder: Arc<dyn EmbeddingService>,
    top_k: usize,
}

impl Retriever {
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// The `top_k` passages most similar to `question`, best first.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Passage>> {
        let query = self
            .embedder
            .embed(question)
            .await
            .context("failed to embed question")?;
        let hits = self.store.search(&query, self.top_k).await;
        Ok(hits.into_iter().map(|(passage, _)| passage).collect())
    }
}
