use thiserror::Error;

/// Errors surfaced by the transport ([`crate::Bot`]) and history ([`crate::MessageHistory`]) layers.
#[derive(Error, Debug)]
pub enum DbotError {
    /// Sending, editing or deleting a message failed.
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("History error: {0}")]
    History(String),

    /// A platform id that cannot be addressed (e.g. zero).
    #[error("Invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbotError>;
