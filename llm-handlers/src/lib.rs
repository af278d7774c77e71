//! # LLM command handlers
//!
//! Chat commands backed by an LLM, and the dispatcher that routes messages to them.
//!
//! - [`CommandDispatcher`]: cache recording, bot filtering, session forwarding, then every command
//!   whose prefix matches.
//! - [`ResponseSender`]: edits a placeholder in place or splits long results into follow-ups.
//! - [`SessionRegistry`]: per-user document Q&A sessions started by `!file`.
//! - [`BotSettings`]: cache size, session timeout, temp dir, retrieval top-k.

pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod sender;
pub mod session;
pub mod settings;
pub mod transcript;

pub use context::{command_args, log_error_chain, preview, HandlerContext};
pub use dispatcher::CommandDispatcher;
pub use sender::{ResponseSender, DEFAULT_LONG_NOTICE};
pub use session::{QuestionGate, SessionKey, SessionRegistry};
pub use settings::BotSettings;
