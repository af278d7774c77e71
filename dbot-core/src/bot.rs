//! Bot abstraction for sending, editing and deleting messages.
//!
//! [`Bot`] is transport-agnostic; `dbot-discord` implements it over the Discord HTTP API
//! and tests substitute recording mocks.

use crate::error::Result;
use crate::types::{Message, SentMessage};
use async_trait::async_trait;

/// Abstraction for outbound chat operations. Implementations map to a transport (e.g. Discord).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Replies to the given message (same channel, referencing it) and returns the sent message handle.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<SentMessage>;
    /// Sends a plain message to a channel.
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<SentMessage>;
    /// Replaces the content of a message the bot sent earlier.
    async fn edit_message(&self, sent: &SentMessage, text: &str) -> Result<()>;
    /// Deletes a message the bot sent earlier.
    async fn delete_message(&self, sent: &SentMessage) -> Result<()>;
    /// Shows the typing indicator in a channel. Default: no-op.
    async fn send_typing(&self, _channel_id: u64) -> Result<()> {
        Ok(())
    }
}
