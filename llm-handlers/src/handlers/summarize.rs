use crate::context::{command_args, log_error_chain, HandlerContext};
use crate::transcript::render_transcript;
use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result, SentMessage};
use prompt::GENERAL_SUMMARY;
use tracing::{error, info, instrument};

pub const SUMMARIZE_PREFIX: &str = "!summarize";
pub const DEFAULT_SUMMARY_LIMIT: usize = 100;
/// Upper bound on `!summarize <n>`.
pub const MAX_SUMMARY_LIMIT: usize = 1000;

const MSG_PLACEHOLDER: &str = "Fetching and summarizing messages...";
const MSG_NO_MESSAGES: &str = "No messages found to summarize.";
const MSG_FAILED: &str = "Sorry, I had trouble generating a summary. Please try again later.";

/// First argument as a message count. Missing, non-numeric or zero → default; capped at [`MAX_SUMMARY_LIMIT`].
pub fn parse_limit(args: &str) -> usize {
    args.split_whitespace()
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_SUMMARY_LIMIT))
        .unwrap_or(DEFAULT_SUMMARY_LIMIT)
}

/// `!summarize [limit]`: summary of the last messages in the channel.
pub struct SummarizeHandler {
    ctx: HandlerContext,
}

impl SummarizeHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    async fn summarize(&self, message: &Message, placeholder: &SentMessage, limit: usize) -> anyhow::Result<()> {
        let mut messages = self.ctx.history.fetch(message.channel_id, limit).await?;
        if messages.is_empty() {
            self.ctx.bot.edit_message(placeholder, MSG_NO_MESSAGES).await?;
            return Ok(());
        }
        messages.reverse();

        let transcript = render_transcript(&messages);
        let summary = self
            .ctx
            .complete(&GENERAL_SUMMARY, &[("messages", transcript.as_str())])
            .await?;
        let header = format!("**Summary of the last {} messages:**\n", messages.len());
        self.ctx.sender.deliver(placeholder, &summary, &header).await?;
        info!(fetched = messages.len(), "step: channel summary delivered");
        Ok(())
    }
}

#[async_trait]
impl Handler for SummarizeHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(SUMMARIZE_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let limit = parse_limit(command_args(&message.content, SUMMARIZE_PREFIX));
        info!(user_id = message.author.id, limit, "step: summarize requested");

        let placeholder = match self.ctx.bot.reply_to(message, MSG_PLACEHOLDER).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send summarize placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        if let Err(e) = self.summarize(message, &placeholder, limit).await {
            log_error_chain(&e, "Summarize failed");
            self.ctx.edit_or_log(&placeholder, MSG_FAILED).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
