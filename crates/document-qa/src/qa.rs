//! Retrieval-augmented answering over one document.

use crate::passages::Passage;
use crate::retriever::Retriever;
use anyhow::Result;
use llm_client::LlmClient;
use prompt::{to_messages, FILE_CONTEXT};
use std::sync::Arc;
use tracing::{info, instrument};

/// Answer plus the passages it was grounded on.
#[derive(Debug, Clone)]
pub struct QaResponse {
    pub answer: String,
    pub source_documents: Vec<Passage>,
}

/// Retriever + LLM chain for one uploaded document.
#[derive(Clone)]
pub struct DocumentQa {
    retriever: Retriever,
    llm: Arc<dyn LlmClient>,
}

impl DocumentQa {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmClient>) -> Self {
        Self { retriever, llm }
    }

    /// Retrieves passages for `question`, stuffs them into the file-context prompt and asks the LLM.
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<QaResponse> {
        let source_documents = self.retriever.retrieve(question).await?;
        let context = source_documents
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let rendered = FILE_CONTEXT.render(&[("context", context.as_str()), ("input", question)])?;
        let answer = self.llm.complete(to_messages(None, rendered)).await?;
        info!(
            passages = source_documents.len(),
            answer_len = answer.len(),
            "step: document question answered"
        );
        Ok(QaResponse {
            answer: answer.trim().to_string(),
            source_documents,
        })
    }
}
