//! # Document Q&A
//!
//! Question answering over a single uploaded document.
//!
//! - [`loader`]: text extraction for `.txt`, `.pdf`, `.docx` and `.pptx`.
//! - [`passages`]: overlapping passages built on chunk-splitter boundaries.
//! - [`store`]: in-memory vector store (cosine similarity).
//! - [`DocumentIndexer`] / [`Retriever`]: file → passages → embeddings → top-k search.
//! - [`DocumentQa`]: retrieved passages + file-context prompt → LLM answer.
//! - [`download_to`]: fetch an attachment into the temp directory.

pub mod download;
pub mod error;
pub mod loader;
pub mod passages;
pub mod qa;
pub mod retriever;
pub mod store;

pub use download::{download_to, safe_file_name};
pub use error::DocumentError;
pub use loader::{load_text, DocumentKind};
pub use passages::{split_passages, Passage};
pub use qa::{DocumentQa, QaResponse};
pub use retriever::{DocumentIndexer, Retriever, DEFAULT_TOP_K};
pub use store::InMemoryVectorStore;
