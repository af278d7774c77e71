//! Minimal transport config: bot token and log path.
//! Loaded from DISCORD_TOKEN and LOG_FILE.

use anyhow::{bail, Result};
use std::env;

pub const DEFAULT_LOG_FILE: &str = "logs/discord-bot.log";

/// Discord connection and logging settings.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub log_file: String,
}

impl DiscordConfig {
    /// Loads from the environment. DISCORD_TOKEN is required unless `token_override` is given.
    pub fn from_env(token_override: Option<String>) -> Result<Self> {
        let token = match token_override {
            Some(token) => token,
            None => env::var("DISCORD_TOKEN").map_err(|_| anyhow::anyhow!("DISCORD_TOKEN not set"))?,
        };
        let log_file = env::var("LOG_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        let config = Self { token, log_file };
        config.validate()?;
        Ok(config)
    }

    /// Builds a config with the given token and the default log file.
    pub fn with_token(token: String) -> Self {
        Self {
            token,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!("DISCORD_TOKEN must not be empty");
        }
        Ok(())
    }
}
