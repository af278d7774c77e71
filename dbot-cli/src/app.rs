//! Builds the bot's components from [`AppConfig`] and runs the gateway.

use crate::cli::AppConfig;
use anyhow::Result;
use dbot_core::{init_tracing, Bot, MessageHistory};
use dbot_discord::{run_gateway, DiscordBotAdapter};
use document_qa::DocumentIndexer;
use llm_client::{LlmClient, LlmConfig, OpenAILlmClient};
use llm_handlers::{CommandDispatcher, HandlerContext};
use message_cache::MessageCache;
use openai_embedding::OpenAIEmbedding;
use std::sync::Arc;
use tracing::{info, instrument};

/// Wires the dispatcher over the given transport. Used by [`run`] and by tests that inject mocks.
pub fn build_dispatcher(
    config: &AppConfig,
    bot: Arc<dyn Bot>,
    history: Arc<dyn MessageHistory>,
) -> CommandDispatcher {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(&config.llm));
    let cache = Arc::new(MessageCache::with_capacity(
        history.clone(),
        config.settings.cache_capacity,
    ));
    let embedder = Arc::new(OpenAIEmbedding::from_config(&config.embedding));
    let indexer = DocumentIndexer::new(embedder).with_top_k(config.settings.document_top_k);
    let ctx = HandlerContext::new(bot, llm, cache, history, config.settings.clone());
    CommandDispatcher::new(ctx, indexer)
}

/// Initializes logging, builds the dispatcher over the Discord API and runs until shutdown.
#[instrument(skip(config))]
pub async fn run(config: AppConfig) -> Result<()> {
    init_tracing(&config.discord.log_file)?;
    info!(
        model = %config.llm.model(),
        base_url = %config.llm.base_url(),
        cache_capacity = config.settings.cache_capacity,
        "Initializing bot"
    );

    let adapter = Arc::new(DiscordBotAdapter::new(config.discord.token.clone()));
    let dispatcher = Arc::new(build_dispatcher(&config, adapter.clone(), adapter));

    info!("Bot started successfully");
    run_gateway(config.discord.token.clone(), dispatcher).await
}
