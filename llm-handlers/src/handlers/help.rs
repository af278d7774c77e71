use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::error;

pub const HELP_PREFIX: &str = "!help";

pub const HELP_TEXT: &str = "**Available commands:**
`!summarize [count]` - Summarize the last messages in this channel (default 100).
`!userSummary @user` - Summarize a user's recent messages.
`!ask <question>` - Answer a question from the recent conversation.
`!file` + attachment - Ask questions about a .txt, .pdf, .docx or .pptx file. Type `exit` to end the session.
`!suggestRole @user` - Suggest server roles based on a user's messages.
`!write <prompt>` - Write long-form content.
`!help` - Show this list.";

/// `!help`: static list of commands.
pub struct HelpHandler {
    bot: Arc<dyn Bot>,
}

impl HelpHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.starts_with(HELP_PREFIX) {
            if let Err(e) = self.bot.reply_to(message, HELP_TEXT).await {
                error!(error = %e, "Failed to send help");
            }
        }
        Ok(HandlerResponse::Continue)
    }
}
