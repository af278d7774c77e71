//! Tests for CLI parsing and config loading.

use clap::Parser;
use dbot_cli::{load_config, Cli, Commands};
use serial_test::serial;
use std::env;

/// **Test: `run --token` overrides the token; `run` alone leaves it to the environment.**
#[test]
fn test_parse_run() {
    let cli = Cli::try_parse_from(["dbot", "run", "--token", "abc"]).unwrap();
    assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "abc"));

    let cli = Cli::try_parse_from(["dbot", "run"]).unwrap();
    assert!(matches!(cli.command, Commands::Run { token: None }));
}

/// **Test: A subcommand is required.**
#[test]
fn test_missing_subcommand_rejected() {
    assert!(Cli::try_parse_from(["dbot"]).is_err());
}

/// **Test: Without DISCORD_TOKEN or `--token`, loading fails.**
#[test]
#[serial]
fn test_load_config_requires_token() {
    env::remove_var("DISCORD_TOKEN");
    assert!(load_config(None).is_err());
}

/// **Test: The CLI token is used and the other sections take their defaults.**
#[test]
#[serial]
fn test_load_config_with_token_override() {
    env::remove_var("DISCORD_TOKEN");
    for var in ["OPENAI_BASE_URL", "LLM_TEMPERATURE", "CACHE_CAPACITY", "DOCUMENT_TOP_K"] {
        env::remove_var(var);
    }
    let config = load_config(Some("token-from-cli".to_string())).unwrap();
    assert_eq!(config.discord.token, "token-from-cli");
    assert_eq!(config.settings.cache_capacity, 500);
    assert_eq!(config.settings.document_top_k, 3);
}
