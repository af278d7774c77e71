//! Wraps the twilight HTTP client and implements [`dbot_core::Bot`] and [`dbot_core::MessageHistory`].
//! Production code talks to the Discord REST API; tests substitute other implementations.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, CachedMessage, DbotError, Message, MessageHistory, Result, SentMessage};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use twilight_http::client::ClientBuilder;
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};
use twilight_model::id::Id;

use super::adapters::DiscordMessageWrapper;

/// Discord's page size limit for the channel history endpoint.
pub const HISTORY_PAGE_SIZE: usize = 100;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn channel_id(raw: u64) -> Result<Id<ChannelMarker>> {
    Id::new_checked(raw).ok_or(DbotError::InvalidId {
        kind: "channel",
        value: raw,
    })
}

fn message_id(raw: u64) -> Result<Id<MessageMarker>> {
    Id::new_checked(raw).ok_or(DbotError::InvalidId {
        kind: "message",
        value: raw,
    })
}

fn bot_error(e: impl std::fmt::Display) -> DbotError {
    DbotError::Bot(e.to_string())
}

/// Thin wrapper around the twilight HTTP client.
#[derive(Clone)]
pub struct DiscordBotAdapter {
    http: Arc<HttpClient>,
}

impl DiscordBotAdapter {
    /// Builds an HTTP client for the given bot token.
    pub fn new(token: String) -> Self {
        let http = ClientBuilder::new().token(token).timeout(HTTP_TIMEOUT).build();
        Self::with_client(Arc::new(http))
    }

    /// Wraps an existing client.
    pub fn with_client(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    async fn create(
        &self,
        channel: u64,
        text: &str,
        reply_to: Option<u64>,
    ) -> Result<SentMessage> {
        let channel = channel_id(channel)?;
        let request = self.http.create_message(channel).content(text);
        let response = match reply_to {
            Some(id) => request.reply(message_id(id)?).await,
            None => request.await,
        }
        .map_err(bot_error)?;
        let sent = response.model().await.map_err(bot_error)?;
        Ok(SentMessage {
            id: sent.id.get(),
            channel_id: sent.channel_id.get(),
        })
    }
}

#[async_trait]
impl CoreBot for DiscordBotAdapter {
    async fn reply_to(&self, message: &Message, text: &str) -> Result<SentMessage> {
        self.create(message.channel_id, text, Some(message.id)).await
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<SentMessage> {
        self.create(channel_id, text, None).await
    }

    async fn edit_message(&self, sent: &SentMessage, text: &str) -> Result<()> {
        self.http
            .update_message(channel_id(sent.channel_id)?, message_id(sent.id)?)
            .content(Some(text))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn delete_message(&self, sent: &SentMessage) -> Result<()> {
        self.http
            .delete_message(channel_id(sent.channel_id)?, message_id(sent.id)?)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_typing(&self, channel: u64) -> Result<()> {
        self.http
            .create_typing_trigger(channel_id(channel)?)
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}

#[async_trait]
impl MessageHistory for DiscordBotAdapter {
    /// Pages backwards through the channel, [`HISTORY_PAGE_SIZE`] messages per request, until
    /// `limit` messages are collected or the history is exhausted. Most recent first.
    #[instrument(skip(self))]
    async fn fetch(&self, channel: u64, limit: usize) -> Result<Vec<CachedMessage>> {
        let channel = channel_id(channel)?;
        let mut collected: Vec<CachedMessage> = Vec::with_capacity(limit);
        let mut before: Option<Id<MessageMarker>> = None;

        while collected.len() < limit {
            let page_size = (limit - collected.len()).min(HISTORY_PAGE_SIZE);
            // page_size <= 100
            let page_limit = page_size as u16;
            let request = self.http.channel_messages(channel);
            let response = match before {
                Some(id) => request.before(id).limit(page_limit).await,
                None => request.limit(page_limit).await,
            }
            .map_err(|e| DbotError::History(e.to_string()))?;
            let page = response
                .models()
                .await
                .map_err(|e| DbotError::History(e.to_string()))?;

            debug!(received = page.len(), requested = page_size, "history page");
            let exhausted = page.len() < page_size;
            before = page.last().map(|m| m.id);
            collected.extend(page.iter().map(|m| DiscordMessageWrapper(m).to_cached()));
            if exhausted || before.is_none() {
                break;
            }
        }

        collected.truncate(limit);
        Ok(collected)
    }
}
