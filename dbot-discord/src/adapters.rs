//! Adapters from Discord (twilight) types to dbot_core types.
//! Depends only on twilight-model and dbot_core type definitions.

use chrono::{DateTime, Utc};
use dbot_core::{Attachment, CachedMessage, Message, ToCoreMessage, ToCoreUser, User};
use twilight_model::channel::message::Mention;
use twilight_model::util::Timestamp;

/// Wraps a twilight User for conversion to core [`User`].
pub struct DiscordUserWrapper<'a>(pub &'a twilight_model::user::User);

impl<'a> ToCoreUser for DiscordUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.get(),
            username: self.0.name.clone(),
            is_bot: self.0.bot,
        }
    }
}

/// Wraps a twilight Mention for conversion to core [`User`].
pub struct DiscordMentionWrapper<'a>(pub &'a Mention);

impl<'a> ToCoreUser for DiscordMentionWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.get(),
            username: self.0.name.clone(),
            is_bot: self.0.bot,
        }
    }
}

/// Wraps a twilight Message for conversion to core [`Message`].
pub struct DiscordMessageWrapper<'a>(pub &'a twilight_model::channel::Message);

impl<'a> ToCoreMessage for DiscordMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            author: DiscordUserWrapper(&msg.author).to_core(),
            content: msg.content.clone(),
            mentions: msg
                .mentions
                .iter()
                .map(|m| DiscordMentionWrapper(m).to_core())
                .collect(),
            attachments: msg
                .attachments
                .iter()
                .map(|a| Attachment {
                    filename: a.filename.clone(),
                    url: a.url.clone(),
                    size: a.size,
                })
                .collect(),
            created_at: to_utc(msg.timestamp),
        }
    }
}

impl<'a> DiscordMessageWrapper<'a> {
    /// History entry for this message (used by the REST history fetch).
    pub fn to_cached(&self) -> CachedMessage {
        self.to_core().to_cached()
    }
}

/// Converts a Discord timestamp; out-of-range values fall back to now.
pub(crate) fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(timestamp.as_micros()).unwrap_or_else(Utc::now)
}
