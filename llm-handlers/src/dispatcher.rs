//! Wires the command handlers into one chain in fixed prefix order.

use crate::context::HandlerContext;
use crate::handlers::{
    AskHandler, BotFilter, FileHandler, HelpHandler, SessionRouter, SuggestRoleHandler,
    SummarizeHandler, UserSummaryHandler, WriteHandler,
};
use crate::session::SessionRegistry;
use async_trait::async_trait;
use dbot_core::{HandlerResponse, Message, MessageDispatcher, Result};
use document_qa::DocumentIndexer;
use handler_chain::HandlerChain;
use message_cache::MessageCache;
use std::sync::Arc;
use tracing::error;

/// Entry point for incoming messages: record → drop bots → forward to open session → commands.
///
/// Recording is a separate step so the transport can run it in event order and spawn the rest.
#[derive(Clone)]
pub struct CommandDispatcher {
    cache: Arc<MessageCache>,
    chain: HandlerChain,
    sessions: SessionRegistry,
}

impl CommandDispatcher {
    pub fn new(ctx: HandlerContext, indexer: DocumentIndexer) -> Self {
        let sessions = SessionRegistry::new(ctx.settings.session_idle);
        let chain = HandlerChain::new()
            .add_handler(Arc::new(BotFilter))
            .add_handler(Arc::new(SessionRouter::new(sessions.clone())))
            .add_handler(Arc::new(SummarizeHandler::new(ctx.clone())))
            .add_handler(Arc::new(UserSummaryHandler::new(ctx.clone())))
            .add_handler(Arc::new(AskHandler::new(ctx.clone())))
            .add_handler(Arc::new(FileHandler::new(ctx.clone(), indexer, sessions.clone())))
            .add_handler(Arc::new(SuggestRoleHandler::new(ctx.clone())))
            .add_handler(Arc::new(WriteHandler::new(ctx.clone())))
            .add_handler(Arc::new(HelpHandler::new(ctx.bot.clone())));
        Self {
            cache: ctx.cache.clone(),
            chain,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Records and handles one message in sequence. Errors are logged, never returned.
    pub async fn dispatch(&self, message: &Message) {
        self.record(message).await;
        if let Err(e) = self.handle(message).await {
            error!(error = %e, message_id = message.id, "Dispatch failed");
        }
    }
}

#[async_trait]
impl MessageDispatcher for CommandDispatcher {
    /// Every message, bots included, goes into the channel cache.
    async fn record(&self, message: &Message) {
        self.cache.record(message.to_cached()).await;
    }

    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        self.chain.handle(message).await
    }
}
