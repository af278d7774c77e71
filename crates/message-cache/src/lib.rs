//! # Message cache
//!
//! Keeps the most recent messages seen in each channel so history questions can be answered without
//! a round trip to the platform.
//!
//! - [`MessageCache::record`] appends to a channel's buffer and evicts oldest-first beyond the capacity.
//! - [`MessageCache::get_recent`] serves from the buffer when it holds enough messages; otherwise it
//!   fetches from the [`MessageHistory`] provider, merges the fetched set into the buffer
//!   (de-duplicated by message id), and returns the fetched set.
//!
//! The lock is never held across the history fetch. A `record` that lands while a fetch is in flight
//! survives the merge; only capacity eviction drops messages.

use dbot_core::{CachedMessage, MessageHistory, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Per-channel buffer size.
pub const DEFAULT_CAPACITY: usize = 500;

/// Process-wide cache of recent channel messages. Construct once and share via `Arc`.
pub struct MessageCache {
    capacity: usize,
    channels: RwLock<HashMap<u64, VecDeque<CachedMessage>>>,
    history: Arc<dyn MessageHistory>,
}

impl MessageCache {
    /// Creates an empty cache with [`DEFAULT_CAPACITY`] backed by the given history provider.
    pub fn new(history: Arc<dyn MessageHistory>) -> Self {
        Self::with_capacity(history, DEFAULT_CAPACITY)
    }

    /// Creates an empty cache with a custom per-channel capacity (at least 1).
    pub fn with_capacity(history: Arc<dyn MessageHistory>, capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: RwLock::new(HashMap::new()),
            history,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a message to its channel's buffer, evicting the oldest entries beyond capacity.
    pub async fn record(&self, message: CachedMessage) {
        let channel_id = message.channel_id;
        let mut channels = self.channels.write().await;
        let buffer = channels.entry(channel_id).or_default();
        buffer.push_back(message);
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
        debug!(channel_id, cached = buffer.len(), "message cache record");
    }

    /// Number of cached messages for a channel.
    pub async fn len(&self, channel_id: u64) -> usize {
        self.channels
            .read()
            .await
            .get(&channel_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    /// Snapshot of a channel's buffer, oldest first.
    pub async fn snapshot(&self, channel_id: u64) -> Vec<CachedMessage> {
        self.channels
            .read()
            .await
            .get(&channel_id)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns up to `limit` recent messages of a channel, oldest first.
    ///
    /// Served from the buffer when it already holds `limit` messages. Otherwise exactly one fetch with
    /// `limit` is issued; its result is merged into the buffer and returned in chronological order.
    #[instrument(skip(self))]
    pub async fn get_recent(&self, channel_id: u64, limit: usize) -> Result<Vec<CachedMessage>> {
        {
            let channels = self.channels.read().await;
            if let Some(buffer) = channels.get(&channel_id) {
                if buffer.len() >= limit {
                    debug!(channel_id, limit, "step: message cache hit");
                    return Ok(buffer.iter().skip(buffer.len() - limit).cloned().collect());
                }
            } else if limit == 0 {
                return Ok(Vec::new());
            }
        }

        info!(channel_id, limit, "step: message cache miss, fetching history");
        let mut fetched = self.history.fetch(channel_id, limit).await?;
        fetched.reverse();
        self.merge(channel_id, &fetched).await;
        info!(
            channel_id,
            fetched = fetched.len(),
            "step: message cache filled from history"
        );
        Ok(fetched)
    }

    /// Merges chronologically ordered history into a channel's buffer.
    async fn merge(&self, channel_id: u64, fetched: &[CachedMessage]) {
        if fetched.is_empty() {
            return;
        }
        let mut channels = self.channels.write().await;
        let buffer = channels.entry(channel_id).or_default();

        let mut seen: HashSet<u64> = HashSet::with_capacity(buffer.len() + fetched.len());
        let mut merged: Vec<CachedMessage> = Vec::with_capacity(buffer.len() + fetched.len());
        for message in fetched.iter().chain(buffer.iter()) {
            if seen.insert(message.id) {
                merged.push(message.clone());
            }
        }
        merged.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let excess = merged.len().saturating_sub(self.capacity);
        *buffer = merged.into_iter().skip(excess).collect();
    }
}
