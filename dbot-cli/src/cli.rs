//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dbot_discord::DiscordConfig;
use embedding::EnvEmbeddingConfig;
use llm_client::EnvLlmConfig;
use llm_handlers::BotSettings;

#[derive(Parser)]
#[command(name = "dbot")]
#[command(about = "Discord bot: channel summaries, conversation Q&A, document Q&A, writing", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Discord bot (config from env; token can override DISCORD_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Every config section the bot needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord: DiscordConfig,
    pub llm: EnvLlmConfig,
    pub embedding: EnvEmbeddingConfig,
    pub settings: BotSettings,
}

/// Loads all sections from the environment. If `token` is provided it overrides DISCORD_TOKEN.
pub fn load_config(token: Option<String>) -> Result<AppConfig> {
    Ok(AppConfig {
        discord: DiscordConfig::from_env(token)?,
        llm: EnvLlmConfig::from_env()?,
        embedding: EnvEmbeddingConfig::from_env()?,
        settings: BotSettings::from_env()?,
    })
}
