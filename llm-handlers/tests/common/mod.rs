//! Shared mocks for llm-handlers integration tests.

#![allow(dead_code)]

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dbot_core::{
    Attachment, Bot, CachedMessage, DbotError, Message, MessageHistory, Result, SentMessage, User,
};
use document_qa::{DocumentIndexer, DocumentQa};
use embedding::EmbeddingService;
use llm_handlers::{BotSettings, HandlerContext};
use llm_client::LlmClient;
use message_cache::MessageCache;
use prompt::ChatMessage;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const CHANNEL: u64 = 500;
pub const BOT_USER_ID: u64 = 1;

/// One outbound call made through [`MockBot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Reply { to: u64, text: String },
    Send { channel_id: u64, text: String },
    Edit { id: u64, text: String },
    Delete { id: u64 },
    Typing { channel_id: u64 },
}

/// Records every call; sent messages get increasing ids starting at 10_000.
pub struct MockBot {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    fail_sends: bool,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(10_000),
            fail_sends: false,
        }
    }

    /// `send_message` fails; replies and edits still work.
    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn sends(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn sent(&self, channel_id: u64) -> SentMessage {
        SentMessage {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            channel_id,
        }
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn reply_to(&self, message: &Message, text: &str) -> Result<SentMessage> {
        self.calls.lock().unwrap().push(Call::Reply {
            to: message.id,
            text: text.to_string(),
        });
        Ok(self.sent(message.channel_id))
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<SentMessage> {
        if self.fail_sends {
            return Err(DbotError::Bot("rate limited".to_string()));
        }
        self.calls.lock().unwrap().push(Call::Send {
            channel_id,
            text: text.to_string(),
        });
        Ok(self.sent(channel_id))
    }

    async fn edit_message(&self, sent: &SentMessage, text: &str) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Edit {
            id: sent.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, sent: &SentMessage) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Delete { id: sent.id });
        Ok(())
    }

    async fn send_typing(&self, channel_id: u64) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Typing { channel_id });
        Ok(())
    }
}

/// Channel log (oldest first) served most-recent-first.
pub struct MockHistory {
    log: Vec<CachedMessage>,
    calls: AtomicUsize,
}

impl MockHistory {
    pub fn new(log: Vec<CachedMessage>) -> Self {
        Self {
            log,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageHistory for MockHistory {
    async fn fetch(&self, _channel_id: u64, limit: usize) -> Result<Vec<CachedMessage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.log.iter().rev().take(limit).cloned().collect())
    }
}

/// LLM answering with a fixed reply. Optionally fails, or waits for [`MockLlm::release`].
pub struct MockLlm {
    reply: String,
    fail: bool,
    hold: Option<Arc<Notify>>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            hold: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::replying("")
        }
    }

    /// Blocks every completion until `release` is called once per pending call.
    pub fn held(reply: &str) -> Self {
        Self {
            hold: Some(Arc::new(Notify::new())),
            ..Self::replying(reply)
        }
    }

    pub fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Text of the last user message sent to the model.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .and_then(|m| m.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> AnyResult<String> {
        self.prompts.lock().unwrap().push(messages);
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.reply.clone())
    }
}

/// Embeds text as counts of a few topic words.
pub struct KeywordEmbedding;

const TOPICS: [&str; 3] = ["cat", "rocket", "garden"];

fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    TOPICS.iter().map(|t| lower.matches(t).count() as f32).collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> AnyResult<Vec<f32>> {
        Ok(keyword_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> AnyResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }
}

pub fn indexer() -> DocumentIndexer {
    DocumentIndexer::new(Arc::new(KeywordEmbedding)).with_top_k(1)
}

/// Document Q&A over a short text, answered by `llm`.
pub async fn document_qa(llm: Arc<MockLlm>) -> DocumentQa {
    let retriever = indexer()
        .index_text("The rocket launched at dawn. The garden needs water.")
        .await
        .unwrap();
    DocumentQa::new(retriever, llm)
}

pub fn user(id: u64, name: &str) -> User {
    User {
        id,
        username: name.to_string(),
        is_bot: false,
    }
}

pub fn bot_user() -> User {
    User {
        id: BOT_USER_ID,
        username: "dbot".to_string(),
        is_bot: true,
    }
}

pub fn message(id: u64, author: User, content: &str) -> Message {
    Message {
        id,
        channel_id: CHANNEL,
        author,
        content: content.to_string(),
        mentions: vec![],
        attachments: vec![],
        created_at: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
    }
}

pub fn with_mentions(mut message: Message, mentions: Vec<User>) -> Message {
    message.mentions = mentions;
    message
}

pub fn with_attachment(mut message: Message, filename: &str, url: &str) -> Message {
    message.attachments = vec![Attachment {
        filename: filename.to_string(),
        url: url.to_string(),
        size: 128,
    }];
    message
}

pub fn cached(id: u64, author: &User, content: &str) -> CachedMessage {
    message(id, author.clone(), content).to_cached()
}

/// Everything a handler test needs, with direct access to the mocks.
pub struct Harness {
    pub bot: Arc<MockBot>,
    pub llm: Arc<MockLlm>,
    pub history: Arc<MockHistory>,
    pub ctx: HandlerContext,
}

impl Harness {
    pub fn new(bot: MockBot, llm: MockLlm, log: Vec<CachedMessage>) -> Self {
        Self::with_settings(bot, llm, log, BotSettings::default())
    }

    pub fn with_settings(bot: MockBot, llm: MockLlm, log: Vec<CachedMessage>, settings: BotSettings) -> Self {
        let bot = Arc::new(bot);
        let llm = Arc::new(llm);
        let history = Arc::new(MockHistory::new(log));
        let cache = Arc::new(MessageCache::with_capacity(history.clone(), settings.cache_capacity));
        let ctx = HandlerContext::new(bot.clone(), llm.clone(), cache, history.clone(), settings);
        Self {
            bot,
            llm,
            history,
            ctx,
        }
    }
}

/// Polls until `check` holds; panics after a few seconds of (possibly paused) time.
pub async fn wait_until<F: Fn() -> bool>(check: F) {
    for _ in 0..500 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}
