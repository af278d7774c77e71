//! Delivery of possibly oversized results: edit the placeholder in place, or edit it to a header and
//! follow up with ordered chunks.

use chunk_splitter::{char_len, split, ChunkOptions, DISCORD_MESSAGE_LIMIT};
use dbot_core::{Bot, Result, SentMessage};
use std::sync::Arc;
use tracing::{debug, info};

/// Placeholder text used when a long result has no header of its own.
pub const DEFAULT_LONG_NOTICE: &str = "Here's your content:";

#[derive(Clone)]
pub struct ResponseSender {
    bot: Arc<dyn Bot>,
    message_limit: usize,
    chunk_options: ChunkOptions,
}

impl ResponseSender {
    /// Platform limit 2000, follow-up chunks of 1900.
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            message_limit: DISCORD_MESSAGE_LIMIT,
            chunk_options: ChunkOptions::default(),
        }
    }

    /// Delivers `header + full_text`. Fits → one edit of the placeholder. Otherwise the placeholder
    /// becomes the header (or [`DEFAULT_LONG_NOTICE`] when the header is empty) and the text follows
    /// in chunks. A header over the platform limit is sent in the chunks instead. The first failed
    /// send aborts delivery.
    pub async fn deliver(&self, placeholder: &SentMessage, full_text: &str, header: &str) -> Result<()> {
        let notice = if header.is_empty() {
            DEFAULT_LONG_NOTICE
        } else {
            header
        };
        self.deliver_with(placeholder, full_text, header, notice, &self.chunk_options)
            .await
    }

    /// Like [`deliver`](Self::deliver) with an explicit long-result notice and chunk options. A notice
    /// over the platform limit is replaced by [`DEFAULT_LONG_NOTICE`] and the header then leads the
    /// chunked text.
    pub async fn deliver_with(
        &self,
        placeholder: &SentMessage,
        full_text: &str,
        header: &str,
        long_notice: &str,
        options: &ChunkOptions,
    ) -> Result<()> {
        if char_len(header) + char_len(full_text) <= self.message_limit {
            debug!(message_id = placeholder.id, "step: delivering in place");
            return self
                .bot
                .edit_message(placeholder, &format!("{}{}", header, full_text))
                .await;
        }

        let chunks = if char_len(long_notice) <= self.message_limit {
            self.bot.edit_message(placeholder, long_notice).await?;
            split(full_text, options)
        } else {
            debug!(notice_len = char_len(long_notice), "notice over the limit, header moved to chunks");
            self.bot.edit_message(placeholder, DEFAULT_LONG_NOTICE).await?;
            split(&format!("{}{}", header, full_text), options)
        };
        info!(
            channel_id = placeholder.channel_id,
            chunk_count = chunks.len(),
            "step: delivering long result as follow-up chunks"
        );
        for chunk in &chunks {
            self.bot.send_message(placeholder.channel_id, chunk).await?;
        }
        Ok(())
    }
}
