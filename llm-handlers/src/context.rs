//! Dependencies shared by all command handlers, plus small helpers they have in common.

use crate::sender::ResponseSender;
use crate::settings::BotSettings;
use dbot_core::{Bot, Message, MessageHistory, SentMessage};
use llm_client::LlmClient;
use message_cache::MessageCache;
use prompt::{to_messages, PromptTemplate};
use std::sync::Arc;
use tracing::{error, info};

/// Everything a command handler talks to. Cheap to clone.
#[derive(Clone)]
pub struct HandlerContext {
    pub bot: Arc<dyn Bot>,
    pub llm: Arc<dyn LlmClient>,
    pub cache: Arc<MessageCache>,
    pub history: Arc<dyn MessageHistory>,
    pub sender: ResponseSender,
    pub settings: BotSettings,
}

impl HandlerContext {
    pub fn new(
        bot: Arc<dyn Bot>,
        llm: Arc<dyn LlmClient>,
        cache: Arc<MessageCache>,
        history: Arc<dyn MessageHistory>,
        settings: BotSettings,
    ) -> Self {
        Self {
            sender: ResponseSender::new(bot.clone()),
            bot,
            llm,
            cache,
            history,
            settings,
        }
    }

    /// Renders `template` and returns the model's trimmed reply.
    pub async fn complete(
        &self,
        template: &PromptTemplate,
        vars: &[(&str, &str)],
    ) -> anyhow::Result<String> {
        let rendered = template.render(vars)?;
        info!(prompt_len = rendered.len(), "step: submitting prompt to LLM");
        let reply = self.llm.complete(to_messages(None, rendered)).await?;
        Ok(reply.trim().to_string())
    }

    /// Replies to `message`; failures are logged and swallowed.
    pub async fn reply_or_log(&self, message: &Message, text: &str) {
        if let Err(e) = self.bot.reply_to(message, text).await {
            error!(error = %e, channel_id = message.channel_id, "Failed to send reply");
        }
    }

    /// Replaces the placeholder text; failures are logged and swallowed.
    pub async fn edit_or_log(&self, placeholder: &SentMessage, text: &str) {
        if let Err(e) = self.bot.edit_message(placeholder, text).await {
            error!(error = %e, message_id = placeholder.id, "Failed to edit placeholder");
        }
    }
}

/// Text after `prefix`, trimmed. Empty when nothing follows.
pub fn command_args<'a>(content: &'a str, prefix: &str) -> &'a str {
    content.strip_prefix(prefix).unwrap_or("").trim()
}

/// At most `max_chars` characters of `text`; a cut is marked with `…`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Logs error and its cause chain. First item with `first_msg`, rest with "Caused by".
pub fn log_error_chain(e: &anyhow::Error, first_msg: &str) {
    for (i, cause) in e.chain().enumerate() {
        if i == 0 {
            error!(cause = %cause, "{}", first_msg);
        } else {
            error!(cause = %cause, "Caused by");
        }
    }
}
