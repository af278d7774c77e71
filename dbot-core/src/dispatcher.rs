//! Two-step message intake driven by a transport's event loop.

use crate::error::Result;
use crate::types::{HandlerResponse, Message};
use async_trait::async_trait;

/// Receives messages from a transport. `record` is awaited in event order before the next event is
/// read; `handle` may run concurrently for different messages.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Ordered bookkeeping for every message (bots included). Keep it short: it blocks the event loop.
    async fn record(&self, message: &Message);

    /// Command phase.
    async fn handle(&self, message: &Message) -> Result<HandlerResponse>;
}
