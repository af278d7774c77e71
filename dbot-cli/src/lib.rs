//! # dbot-cli
//!
//! Argument parsing, config loading and component wiring for the `dbot` binary.

pub mod app;
pub mod cli;

pub use app::{build_dispatcher, run};
pub use cli::{load_config, AppConfig, Cli, Commands};
