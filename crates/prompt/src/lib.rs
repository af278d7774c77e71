//! # Prompt
//!
//! Prompt templates for every LLM-backed command and the chat message types sent to the model.
//!
//! ## Templates
//!
//! A [`PromptTemplate`] is plain text with `{name}` placeholders. [`PromptTemplate::render`] fills
//! them from `(name, value)` pairs and fails with [`PromptError::MissingVariable`] when a placeholder
//! has no value. Braces that do not enclose an identifier are left as they are, so rendered chat
//! transcripts containing `{` or `}` pass through untouched.
//!
//! ## External interactions
//!
//! - **AI models**: the rendered text is sent as one user message ([`to_messages`]) to an
//!   OpenAI-compatible chat API.

use thiserror::Error;

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing template variable: {0}")]
    MissingVariable(String),
}

/// Text template with `{name}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn as_str(&self) -> &'static str {
        self.template
    }

    /// Placeholder names in order of appearance (duplicates kept).
    pub fn variables(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_identifier(&after[..end]) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                _ => rest = after,
            }
        }
        names
    }

    /// Replaces every `{name}` with its value. Values are inserted verbatim and never re-scanned.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, PromptError> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_identifier(&after[..end]) => {
                    let name = &after[..end];
                    let value = vars
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| PromptError::MissingVariable(name.to_string()))?;
                    out.push_str(value);
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builds the request messages: optional system prompt, then the rendered prompt as a user message.
pub fn to_messages(system_prompt: Option<&str>, rendered: impl Into<String>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(rendered));
    messages
}

/// `!summarize`: `{messages}`.
pub const GENERAL_SUMMARY: PromptTemplate = PromptTemplate::new(
    "You are a helpful Discord bot that summarizes conversations. Below is a chat history:

{messages}

Please provide a clear, concise summary of the main discussion points, decisions, and important information from this conversation.",
);

/// `!userSummary`: `{username}`, `{messages}`.
pub const USER_SUMMARY: PromptTemplate = PromptTemplate::new(
    "You are a helpful Discord bot that analyzes user messages. Below are messages from a specific user:

Username: {username}
Messages:
{messages}

Please provide a summary of the main points, contributions, and patterns in this user's messages.",
);

/// `!ask`: `{messages}`, `{question}`.
pub const CONVERSATION_QA: PromptTemplate = PromptTemplate::new(
    "You are a helpful Discord bot that can answer questions about conversation history.
Below is the recent conversation history:

{messages}

Based on the conversation above, please answer the following question:
Question: {question}

If the question cannot be answered based on the provided conversation history, politely state that you don't have enough information to answer accurately.",
);

/// Document Q&A: `{context}`, `{input}`.
pub const FILE_CONTEXT: PromptTemplate = PromptTemplate::new(
    "You are a helpful assistant that only provides answers based on the document provided by the user. Your response will be associated with only the document provided by the user.
Answer the user's question.
Context: {context}
Question: {input}",
);

/// `!suggestRole`: `{username}`, `{messages}`.
pub const ROLE_SUGGESTION: PromptTemplate = PromptTemplate::new(
    "You are a helpful Discord bot that suggests server roles. Below are recent messages from a specific user:

Username: {username}
Messages:
{messages}

Based on the topics, tone, and contributions in these messages, suggest up to three Discord roles that would suit this user. For each role give a short name and one sentence explaining why it fits.",
);

/// `!write`: `{request}`.
pub const WRITE_CONTENT: PromptTemplate = PromptTemplate::new(
    "You are a skilled writer helping members of a Discord server. Write content for the following request:

{request}

Use Markdown formatting with headings where it helps structure the text. Respond with the content only.",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_in_order() {
        assert_eq!(CONVERSATION_QA.variables(), vec!["messages", "question"]);
        assert_eq!(FILE_CONTEXT.variables(), vec!["context", "input"]);
        assert_eq!(WRITE_CONTENT.variables(), vec!["request"]);
    }

    #[test]
    fn test_to_messages_skips_blank_system() {
        let msgs = to_messages(Some("  "), "hi");
        assert_eq!(msgs, vec![ChatMessage::user("hi")]);
        let msgs = to_messages(Some("Be brief."), "hi");
        assert_eq!(msgs[0].role, MessageRole::System);
        assert_eq!(msgs[1].content, "hi");
    }
}
