//! Renders history entries into prompt text.

use dbot_core::CachedMessage;

/// `username: content` per non-bot message, one per line, in the given (chronological) order.
pub fn render_transcript(messages: &[CachedMessage]) -> String {
    messages
        .iter()
        .filter(|m| !m.is_bot)
        .map(|m| format!("{}: {}", m.author_name, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Messages written by `user_id`, in the given order.
pub fn messages_by(messages: &[CachedMessage], user_id: u64) -> Vec<&CachedMessage> {
    messages.iter().filter(|m| m.author_id == user_id).collect()
}

/// Contents only, one per line.
pub fn render_contents(messages: &[&CachedMessage]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
