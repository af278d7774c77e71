use crate::context::{log_error_chain, HandlerContext};
use crate::handlers::{target_user, USER_HISTORY_LIMIT};
use crate::transcript::{messages_by, render_contents};
use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result, SentMessage, User};
use prompt::USER_SUMMARY;
use tracing::{error, info, instrument};

pub const USER_SUMMARY_PREFIX: &str = "!userSummary";

const MSG_USAGE: &str = "Please specify a username. For example: `!userSummary @username`";
const MSG_FAILED: &str = "Sorry, I had trouble generating a summary. Please try again later.";

/// `!userSummary @user`: summary of one user's recent messages.
pub struct UserSummaryHandler {
    ctx: HandlerContext,
}

impl UserSummaryHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    async fn summarize_user(&self, message: &Message, placeholder: &SentMessage, target: &User) -> anyhow::Result<()> {
        let mut history = self.ctx.history.fetch(message.channel_id, USER_HISTORY_LIMIT).await?;
        history.reverse();
        let authored = messages_by(&history, target.id);
        if authored.is_empty() {
            let text = format!("No messages found from {} in the recent history.", target.username);
            self.ctx.bot.edit_message(placeholder, &text).await?;
            return Ok(());
        }

        let contents = render_contents(&authored);
        let summary = self
            .ctx
            .complete(
                &USER_SUMMARY,
                &[("username", target.username.as_str()), ("messages", contents.as_str())],
            )
            .await?;
        let header = format!("**Summary of {}'s messages:**\n", target.username);
        self.ctx.sender.deliver(placeholder, &summary, &header).await?;
        info!(target_id = target.id, authored = authored.len(), "step: user summary delivered");
        Ok(())
    }
}

#[async_trait]
impl Handler for UserSummaryHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(USER_SUMMARY_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let target = match target_user(message, MSG_USAGE) {
            Ok(user) => user,
            Err(reply) => {
                self.ctx.reply_or_log(message, reply).await;
                return Ok(HandlerResponse::Continue);
            }
        };
        info!(user_id = message.author.id, target_id = target.id, "step: user summary requested");

        let text = format!("Fetching and summarizing messages from {}...", target.username);
        let placeholder = match self.ctx.bot.reply_to(message, &text).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send user summary placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        if let Err(e) = self.summarize_user(message, &placeholder, target).await {
            log_error_chain(&e, "User summary failed");
            self.ctx.edit_or_log(&placeholder, MSG_FAILED).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
