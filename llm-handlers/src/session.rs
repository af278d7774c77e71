//! Document Q&A sessions opened by `!file`.
//!
//! One session per (author, channel). Messages from that author in that channel are forwarded to
//! the session task, which answers them one at a time against the indexed document. A session ends
//! on `exit`, after an idle timeout, or when a new `!file` from the same author replaces it.

use crate::context::log_error_chain;
use chunk_splitter::{char_len, split, ChunkOptions, DISCORD_MESSAGE_LIMIT};
use dbot_core::{Bot, Message, SentMessage};
use document_qa::DocumentQa;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

pub const MSG_SESSION_EXIT: &str = "Ending Q&A session. Goodbye!";
pub const MSG_PROCESSING_QUESTION: &str = "🔍 Processing your question...";
pub const MSG_NO_ANSWER: &str =
    "I couldn't find relevant information in the document to answer your question.";
pub const MSG_ANSWER_FAILED: &str = "Sorry, I encountered an error while processing your question.";
pub const MSG_SESSION_TIMEOUT: &str =
    "❌ Q&A session ended due to inactivity. Type `!file` to start again.";

const EXIT_COMMAND: &str = "exit";

/// (author id, channel id)
pub type SessionKey = (u64, u64);

// ---------- QuestionGate ----------

/// Single-permit gate: at most one question per session is answered at a time.
#[derive(Clone)]
pub struct QuestionGate {
    permits: Arc<Semaphore>,
}

impl Default for QuestionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionGate {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// None when a question is already in progress.
    pub fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.permits.clone().try_acquire_owned().ok()
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

// ---------- SessionRegistry ----------

struct SessionHandle {
    id: u64,
    tx: mpsc::UnboundedSender<Message>,
}

/// Open sessions by (author, channel). Cloning shares the same registry.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionKey, SessionHandle>>>,
    next_id: Arc<AtomicU64>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Starts a session for `key`, replacing any session already open for it. `placeholder` is the
    /// bot message edited when the session times out. The returned handle completes when the
    /// session ends.
    #[instrument(skip(self, bot, qa, placeholder))]
    pub async fn open(
        &self,
        key: SessionKey,
        bot: Arc<dyn Bot>,
        qa: DocumentQa,
        placeholder: SentMessage,
    ) -> JoinHandle<()> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let replaced = self
            .sessions
            .lock()
            .await
            .insert(key, SessionHandle { id, tx })
            .is_some();
        info!(
            user_id = key.0,
            channel_id = key.1,
            session_id = id,
            replaced,
            "step: document session opened"
        );

        let session = Session {
            bot,
            qa,
            placeholder,
            gate: QuestionGate::new(),
            idle_timeout: self.idle_timeout,
        };
        let registry = self.clone();
        tokio::spawn(async move {
            session.run(rx).await;
            registry.remove(key, id).await;
        })
    }

    /// Forwards `message` to the session of its author in its channel. False when none is open.
    pub async fn forward(&self, message: &Message) -> bool {
        let key = (message.author.id, message.channel_id);
        let mut sessions = self.sessions.lock().await;
        let Some(handle) = sessions.get(&key) else {
            return false;
        };
        if handle.tx.send(message.clone()).is_ok() {
            return true;
        }
        // receiver already gone: the session ended between messages
        sessions.remove(&key);
        false
    }

    pub async fn is_open(&self, key: SessionKey) -> bool {
        self.sessions.lock().await.contains_key(&key)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Removes the entry for `key` only if it still belongs to session `id`.
    async fn remove(&self, key: SessionKey, id: u64) {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&key).is_some_and(|h| h.id == id) {
            sessions.remove(&key);
            info!(user_id = key.0, channel_id = key.1, session_id = id, "step: document session closed");
        }
    }
}

// ---------- Session loop ----------

struct Session {
    bot: Arc<dyn Bot>,
    qa: DocumentQa,
    placeholder: SentMessage,
    gate: QuestionGate,
    idle_timeout: Duration,
}

impl Session {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Message>) {
        loop {
            let message = match tokio::time::timeout(self.idle_timeout, rx.recv()).await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!("session replaced");
                    return;
                }
                Err(_) => {
                    info!(channel_id = self.placeholder.channel_id, "step: document session timed out");
                    if !self.gate.is_busy() {
                        if let Err(e) = self.bot.edit_message(&self.placeholder, MSG_SESSION_TIMEOUT).await {
                            error!(error = %e, "Failed to edit session placeholder");
                        }
                    }
                    return;
                }
            };

            let Some(permit) = self.gate.try_acquire() else {
                debug!(message_id = message.id, "question in progress, message dropped");
                continue;
            };

            if message.content.trim().eq_ignore_ascii_case(EXIT_COMMAND) {
                if let Err(e) = self.bot.reply_to(&message, MSG_SESSION_EXIT).await {
                    error!(error = %e, "Failed to send session exit reply");
                }
                return;
            }

            let bot = self.bot.clone();
            let qa = self.qa.clone();
            tokio::spawn(async move {
                answer_question(bot, qa, message, permit).await;
            });
        }
    }
}

/// Answers one question. The permit is held until every reply has been sent.
async fn answer_question(bot: Arc<dyn Bot>, qa: DocumentQa, message: Message, _permit: OwnedSemaphorePermit) {
    let processing = match bot.reply_to(&message, MSG_PROCESSING_QUESTION).await {
        Ok(sent) => sent,
        Err(e) => {
            error!(error = %e, "Failed to send processing reply");
            return;
        }
    };

    let question = message.content.trim();
    let result = match qa.answer(question).await {
        Ok(response) if response.answer.is_empty() => bot.reply_to(&message, MSG_NO_ANSWER).await.map(|_| ()),
        Ok(response) => send_answer(bot.as_ref(), &message, &processing, &response.answer).await,
        Err(e) => {
            log_error_chain(&e, "Document question failed");
            bot.reply_to(&message, MSG_ANSWER_FAILED).await.map(|_| ())
        }
    };
    if let Err(e) = result {
        error!(error = %e, message_id = message.id, "Failed to deliver document answer");
    }
}

async fn send_answer(
    bot: &dyn Bot,
    message: &Message,
    processing: &SentMessage,
    answer: &str,
) -> dbot_core::Result<()> {
    if char_len(answer) <= DISCORD_MESSAGE_LIMIT {
        bot.reply_to(message, answer).await?;
        return Ok(());
    }
    if let Err(e) = bot.delete_message(processing).await {
        debug!(error = %e, "processing reply already gone");
    }
    for chunk in split(answer, &ChunkOptions::default()) {
        bot.reply_to(message, &chunk).await?;
    }
    Ok(())
}
