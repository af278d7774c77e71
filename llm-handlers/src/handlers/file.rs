use crate::context::{log_error_chain, HandlerContext};
use crate::session::SessionRegistry;
use async_trait::async_trait;
use dbot_core::{Attachment, Handler, HandlerResponse, Message, Result, SentMessage};
use document_qa::{download_to, DocumentError, DocumentIndexer, DocumentQa};
use tracing::{error, info, instrument, warn};

pub const FILE_PREFIX: &str = "!file";

const MSG_NO_ATTACHMENT: &str = "Please attach a file to summarize.";
const MSG_PLACEHOLDER: &str = "Processing your file...";
const MSG_DOWNLOAD_FAILED: &str = "Error downloading the file. Please try again.";
const MSG_UNSUPPORTED: &str = "Unsupported file type or error processing the file.";
const MSG_READY: &str =
    "✅ File processed! You can now ask questions about the content. Type `exit` to end the session.";

/// `!file` + attachment: indexes the document and opens a Q&A session for the author.
pub struct FileHandler {
    ctx: HandlerContext,
    indexer: DocumentIndexer,
    sessions: SessionRegistry,
    http: reqwest::Client,
}

impl FileHandler {
    pub fn new(ctx: HandlerContext, indexer: DocumentIndexer, sessions: SessionRegistry) -> Self {
        Self {
            ctx,
            indexer,
            sessions,
            http: reqwest::Client::new(),
        }
    }

    async fn process(&self, message: &Message, placeholder: SentMessage, attachment: &Attachment) {
        let path = match download_to(
            &self.http,
            &attachment.url,
            &self.ctx.settings.file_temp_dir,
            &attachment.filename,
            message.id,
        )
        .await
        {
            Ok(path) => path,
            Err(e) => {
                log_error_chain(&e, "Attachment download failed");
                self.ctx.edit_or_log(&placeholder, MSG_DOWNLOAD_FAILED).await;
                return;
            }
        };

        let indexed = self.indexer.index(&path).await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(error = %e, path = %path.display(), "Failed to remove temp file");
        }

        let retriever = match indexed {
            Ok(retriever) => retriever,
            Err(e) => {
                match e.downcast_ref::<DocumentError>() {
                    Some(DocumentError::Unsupported(ext)) => {
                        info!(extension = %ext, "unsupported attachment type");
                    }
                    _ => log_error_chain(&e, "Document indexing failed"),
                }
                self.ctx.edit_or_log(&placeholder, MSG_UNSUPPORTED).await;
                return;
            }
        };

        if let Err(e) = self.ctx.bot.edit_message(&placeholder, MSG_READY).await {
            error!(error = %e, "Failed to edit file placeholder");
        }
        let qa = DocumentQa::new(retriever, self.ctx.llm.clone());
        self.sessions
            .open(
                (message.author.id, message.channel_id),
                self.ctx.bot.clone(),
                qa,
                placeholder,
            )
            .await;
    }
}

#[async_trait]
impl Handler for FileHandler {
    #[instrument(skip(self, message), fields(message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.content.starts_with(FILE_PREFIX) {
            return Ok(HandlerResponse::Continue);
        }
        let Some(attachment) = message.attachments.first() else {
            self.ctx.reply_or_log(message, MSG_NO_ATTACHMENT).await;
            return Ok(HandlerResponse::Continue);
        };
        info!(
            user_id = message.author.id,
            file_name = %attachment.filename,
            size = attachment.size,
            "step: file received"
        );

        let placeholder = match self.ctx.bot.reply_to(message, MSG_PLACEHOLDER).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, "Failed to send file placeholder");
                return Ok(HandlerResponse::Continue);
            }
        };
        self.process(message, placeholder, attachment).await;
        Ok(HandlerResponse::Continue)
    }
}
