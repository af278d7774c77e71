use crate::context::{command_args, log_error_chain, preview, HandlerContext};
use async_trait::async_trait;
use chunk_splitter::ChunkOptions;
use dbot_core::{Handler, HandlerResponse, Message, Result, SentMessage};
use prompt::WRITE_CONTENT;
use tracing::{debug, error, info, instrument};

pub const WRITE_PREFIX: &str = "!write";
/// Follow-up chunk size for generated long-form content.
pub const WRITE_CONTENT_CHUNK_SIZE: usize = 1950;
/// How much of the prompt is echoed back in status messages.
pub const PROMPT_ECHO_CHARS: usize = 200;

const MSG_USAGE: &str = "Please include a prompt. For example: `!write a short blog post about Rust`";
const MSG_FAILED: &str = "❌ An error occurred while writing the content. Please try again later.";

/// `!write <prompt>`: long-form content generation.
pub struct WriteHandler {
    ctx: HandlerContext,
}

impl WriteHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    async fn write(&self, message: &Message, placeholder: &SentMessage, request: &str) -> anyhow::Result<()> {
        if let Err(e) = self.ctx.bot.send_typing(message.channel_id).await {
            debug!(error = %e, "typing indicator failed");
        }
        let content = self.ctx.complete(&WRITE_CONTENT, &[("request", request)]).await?;

        let notice = format!(
            "Here's your content about \"{}\":",
            preview(request, PROMPT_ECHO_CHARS)
        );
        let options = ChunkOptions::new(WRITE_CONTENT_CHUNK_SIZE).with_heading_breaks(true);
        self.ctx
            .sender
            .deliver_with(placeholder, &content, "", &notice, &options)
            .await?;
        info!(content_len = content.len(), "step: written content delivered");
        Ok(())
    }
}

#[async_trait]
impl Handler for WriteHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(WRITE_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let request = command_args(&message.content, WRITE_PREFIX);
        if request.is_empty() {
            self.ctx.reply_or_log(message, MSG_USAGE).await;
            return Ok(HandlerResponse::Continue);
        }

        let text = format!(
            "📝 Working on writing content about: \"{}\". This may take a moment...",
            preview(request, PROMPT_ECHO_CHARS)
        );
        let placeholder = match self.ctx.bot.reply_to(message, &text).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send write placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        if let Err(e) = self.write(message, &placeholder, request).await {
            log_error_chain(&e, "Write failed");
            self.ctx.edit_or_log(&placeholder, MSG_FAILED).await;
        }
        Ok(HandlerResponse::Continue)
    }
}
