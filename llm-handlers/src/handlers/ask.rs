use crate::context::{command_args, log_error_chain, HandlerContext};
use crate::transcript::render_transcript;
use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result, SentMessage};
use prompt::CONVERSATION_QA;
use tracing::{error, info, instrument};

pub const ASK_PREFIX: &str = "!ask";

/// Recent cached messages used as context for a question.
const CONTEXT_LIMIT: usize = 100;

const MSG_USAGE: &str =
    "Please include a question. For example: `!ask What was decided about the project deadline?`";
const MSG_PLACEHOLDER: &str = "Searching conversation history for an answer...";
const MSG_NO_HISTORY: &str = "No conversation history found to answer from.";
const MSG_FAILED: &str = "Sorry, I had trouble answering your question. Please try again later.";

/// `!ask <question>`: answers from the channel's recent conversation.
pub struct AskHandler {
    ctx: HandlerContext,
}

impl AskHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    async fn answer(&self, message: &Message, placeholder: &SentMessage, question: &str) -> anyhow::Result<()> {
        let recent = self.ctx.cache.get_recent(message.channel_id, CONTEXT_LIMIT).await?;
        if recent.is_empty() {
            self.ctx.bot.edit_message(placeholder, MSG_NO_HISTORY).await?;
            return Ok(());
        }

        let transcript = render_transcript(&recent);
        let answer = self
            .ctx
            .complete(
                &CONVERSATION_QA,
                &[("messages", transcript.as_str()), ("question", question)],
            )
            .await?;
        let header = format!("**Question:** {}\n\n**Answer:** ", question);
        self.ctx.sender.deliver(placeholder, &answer, &header).await?;
        info!(context_messages = recent.len(), "step: conversation answer delivered");
        Ok(())
    }
}

#[async_trait]
impl Handler for AskHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(ASK_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let question = command_args(&message.content, ASK_PREFIX);
        if question.is_empty() {
            self.ctx.reply_or_log(message, MSG_USAGE).await;
            return Ok(HandlerResponse::Continue);
        }
        info!(user_id = message.author.id, question_len = question.len(), "step: ask requested");

        let placeholder = match self.ctx.bot.reply_to(message, MSG_PLACEHOLDER).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send ask placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        if let Err(e) = self.answer(message, &placeholder, question).await {
            log_error_chain(&e, "Ask failed");
            self.ctx.edit_or_log(&placeholder, MSG_FAILED).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
