use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to extract text: {0}")]
    Extract(String),

    #[error("Document contains no text")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
