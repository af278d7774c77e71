//! Integration tests for document indexing and answering with mock embedding and LLM services.

use anyhow::Result;
use async_trait::async_trait;
use document_qa::{DocumentError, DocumentIndexer, DocumentQa};
use embedding::EmbeddingService;
use llm_client::LlmClient;
use prompt::ChatMessage;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TOPICS: [&str; 3] = ["cat", "rocket", "garden"];

/// Embeds text as counts of a few topic words, enough for deterministic similarity.
struct KeywordEmbedding;

fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    TOPICS
        .iter()
        .map(|t| lower.matches(t).count() as f32)
        .collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }
}

/// LLM that records the prompts it receives and answers with a fixed string.
struct RecordingLlm {
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl LlmClient for RecordingLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.prompts.lock().unwrap().push(messages);
        Ok("  The rocket launched at dawn.  ".to_string())
    }
}

fn indexer() -> DocumentIndexer {
    DocumentIndexer::new(Arc::new(KeywordEmbedding))
        .with_top_k(1)
        .with_passage_size(120, 20)
}

fn sample_text() -> String {
    let cats = "The cat sleeps all day. A cat likes warm places. ".repeat(3);
    let rockets = "The rocket launched at dawn. Rocket engines roared. ".repeat(3);
    let garden = "The garden needs water. Garden beds were planted. ".repeat(3);
    format!("{}\n\n{}\n\n{}", cats, rockets, garden)
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("word/document.xml", options).unwrap();
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    write!(zip, "<w:document><w:body>{}</w:body></w:document>", body).unwrap();
    zip.finish().unwrap();
}

/// **Test: A text file is indexed and the most similar passage is retrieved.**
#[tokio::test]
async fn test_index_txt_and_retrieve() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, sample_text()).unwrap();

    let retriever = indexer().index(&path).await.unwrap();
    let hits = retriever.retrieve("When did the rocket launch?").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].text.to_lowercase().contains("rocket"));
}

/// **Test: Indexing runs on a spawned task, so handlers holding it stay `Send`.**
#[tokio::test]
async fn test_index_on_spawned_task() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, sample_text()).unwrap();

    let indexer = indexer();
    let retriever = tokio::spawn(async move { indexer.index(&path).await })
        .await
        .unwrap()
        .unwrap();
    assert!(!retriever.retrieve("garden").await.unwrap().is_empty());
}

/// **Test: A .docx file is read through its document.xml text runs.**
#[tokio::test]
async fn test_index_docx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Plan.DOCX");
    write_docx(&path, &["Garden plan for spring", "Water the garden daily"]);

    let text = document_qa::load_text(&path).unwrap();
    assert_eq!(text, "Garden plan for spring\nWater the garden daily\n");

    let retriever = indexer().index(&path).await.unwrap();
    let hits = retriever.retrieve("garden").await.unwrap();
    assert!(hits[0].text.contains("Garden plan"));
}

/// **Test: Legacy .doc and unknown extensions fail as unsupported.**
#[tokio::test]
async fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    for name in ["old.doc", "image.png"] {
        let path = dir.path().join(name);
        std::fs::write(&path, b"binary").unwrap();
        let err = indexer().index(&path).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<DocumentError>(),
            Some(DocumentError::Unsupported(_))
        ));
    }
}

/// **Test: A document without text is rejected.**
#[tokio::test]
async fn test_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.txt");
    std::fs::write(&path, "  \n\n ").unwrap();
    let err = indexer().index(&path).await.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<DocumentError>(),
        Some(DocumentError::Empty)
    ));
}

/// **Test: answer() sends retrieved context and the question in one user message and trims the answer.**
#[tokio::test]
async fn test_answer_uses_retrieved_context() {
    let retriever = indexer().index_text(&sample_text()).await.unwrap();
    let llm = Arc::new(RecordingLlm {
        prompts: Mutex::new(Vec::new()),
    });
    let qa = DocumentQa::new(retriever, llm.clone());

    let response = qa.answer("Tell me about the rocket").await.unwrap();
    assert_eq!(response.answer, "The rocket launched at dawn.");
    assert_eq!(response.source_documents.len(), 1);

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].len(), 1);
    let content = &prompts[0][0].content;
    assert!(content.contains("Question: Tell me about the rocket"));
    assert!(content.contains(&response.source_documents[0].text));
}
