//! # dbot-discord
//!
//! Discord transport layer: adapters from twilight types, [`dbot_core::Bot`] and
//! [`dbot_core::MessageHistory`] over the REST API, minimal config, gateway runner.
//! Handles only Discord connectivity and message intake; no LLM or document logic.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{DiscordMentionWrapper, DiscordMessageWrapper, DiscordUserWrapper};
pub use bot_adapter::{DiscordBotAdapter, HISTORY_PAGE_SIZE};
pub use config::{DiscordConfig, DEFAULT_LOG_FILE};
pub use runner::{accept_message, intents, run_gateway};
