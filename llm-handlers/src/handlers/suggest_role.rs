use crate::context::{log_error_chain, HandlerContext};
use crate::handlers::{target_user, USER_HISTORY_LIMIT};
use crate::transcript::{messages_by, render_contents};
use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result, SentMessage, User};
use prompt::ROLE_SUGGESTION;
use tracing::{error, info, instrument};

pub const SUGGEST_ROLE_PREFIX: &str = "!suggestRole";

/// Fewer authored messages than this is not enough to judge a role.
const MIN_MESSAGES: usize = 2;

const MSG_USAGE: &str = "Please specify a username. For example: `!suggestRole @username`";
const MSG_FAILED: &str = "An error occurred while fetching messages. Please try again later.";

/// `!suggestRole @user`: server roles that fit a user's recent messages.
pub struct SuggestRoleHandler {
    ctx: HandlerContext,
}

impl SuggestRoleHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    async fn suggest(&self, message: &Message, placeholder: &SentMessage, target: &User) -> anyhow::Result<()> {
        let mut history = self.ctx.history.fetch(message.channel_id, USER_HISTORY_LIMIT).await?;
        history.reverse();
        let authored = messages_by(&history, target.id);
        if authored.len() < MIN_MESSAGES {
            let text = format!("Insufficient messages found from {} to suggest roles.", target.username);
            self.ctx.bot.edit_message(placeholder, &text).await?;
            return Ok(());
        }

        let contents = render_contents(&authored);
        let suggestion = self
            .ctx
            .complete(
                &ROLE_SUGGESTION,
                &[("username", target.username.as_str()), ("messages", contents.as_str())],
            )
            .await?;
        let header = format!("**Suggested roles for {}:**\n", target.username);
        self.ctx.sender.deliver(placeholder, &suggestion, &header).await?;
        info!(target_id = target.id, "step: role suggestion delivered");
        Ok(())
    }
}

#[async_trait]
impl Handler for SuggestRoleHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(SUGGEST_ROLE_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let target = match target_user(message, MSG_USAGE) {
            Ok(user) => user,
            Err(reply) => {
                self.ctx.reply_or_log(message, reply).await;
                return Ok(HandlerResponse::Continue);
            }
        };

        let text = format!("Fetching messages from {}...", target.username);
        let placeholder = match self.ctx.bot.reply_to(message, &text).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send role suggestion placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        if let Err(e) = self.suggest(message, &placeholder, target).await {
            log_error_chain(&e, "Role suggestion failed");
            self.ctx.edit_or_log(&placeholder, MSG_FAILED).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
