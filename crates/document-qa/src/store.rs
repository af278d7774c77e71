//! In-memory vector store over document passages, searched by cosine similarity.

use crate::passages::Passage;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    passage: Passage,
    embedding: Vec<f32>,
}

/// Passages with their embeddings. Cloning shares the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Adds passages paired with their embeddings. Extra items on either side are ignored.
    pub async fn add(&self, passages: Vec<Passage>, embeddings: Vec<Vec<f32>>) {
        let mut entries = self.entries.write().await;
        entries.extend(
            passages
                .into_iter()
                .zip(embeddings)
                .map(|(passage, embedding)| Entry { passage, embedding }),
        );
    }

    /// Top `k` passages by cosine similarity to `query`, best first. Ties keep document order.
    pub async fn search(&self, query: &[f32], k: usize) -> Vec<(Passage, f32)> {
        let entries = self.entries.read().await;
        let mut scored: Vec<(Passage, f32)> = entries
            .iter()
            .map(|e| (e.passage.clone(), cosine_similarity(query, &e.embedding)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.index.cmp(&b.0.index))
        });
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity; 0.0 for empty or zero-norm vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
