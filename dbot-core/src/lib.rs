//! # dbot-core
//!
//! Core types and traits for the Discord bot: [`Bot`], [`MessageHistory`], [`Handler`],
//! [`MessageDispatcher`], message and user types, errors, and tracing initialization.
//! Transport-agnostic; used by dbot-discord, handler-chain, message-cache and llm-handlers.

pub mod bot;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use dispatcher::MessageDispatcher;
pub use error::{DbotError, Result};
pub use history::MessageHistory;
pub use logger::init_tracing;
pub use types::{
    Attachment, CachedMessage, Handler, HandlerResponse, Message, SentMessage, ToCoreMessage,
    ToCoreUser, User,
};
