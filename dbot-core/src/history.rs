//! Message-history provider: fetches past messages of a channel from the platform.

use crate::error::Result;
use crate::types::CachedMessage;
use async_trait::async_trait;

/// Source of channel history. Results are most-recent-first, as the platform delivers them;
/// callers reverse before building transcripts.
#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// Fetches up to `limit` of the most recent messages in `channel_id`.
    async fn fetch(&self, channel_id: u64, limit: usize) -> Result<Vec<CachedMessage>>;
}
