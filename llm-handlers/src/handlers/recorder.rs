//! Handlers that run for every message: bot filtering and session forwarding.

use crate::handlers::FILE_PREFIX;
use crate::session::SessionRegistry;
use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::debug;

/// Stops the chain for messages written by bot accounts.
pub struct BotFilter;

#[async_trait]
impl Handler for BotFilter {
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.author.is_bot {
            debug!(user_id = message.author.id, "bot message ignored");
        }
        Ok(!message.author.is_bot)
    }
}

/// Forwards messages to the author's open document session in that channel. `!file` messages
/// start a new session instead and are not forwarded.
pub struct SessionRouter {
    sessions: SessionRegistry,
}

impl SessionRouter {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Handler for SessionRouter {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(FILE_PREFIX) && self.sessions.forward(message).await {
            debug!(
                user_id = message.author.id,
                channel_id = message.channel_id,
                "message forwarded to document session"
            );
        }
        Ok(HandlerResponse::Continue)
    }
}
