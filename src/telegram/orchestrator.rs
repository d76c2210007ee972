//! Per-event request handling for the download bot.
//!
//! Handlers in `telegram::handlers` only extract ids and payloads from the
//! update and call into the [`Orchestrator`]; all decisions live here so they
//! can be exercised with an in-memory transport.

use std::sync::Arc;
use teloxide::types::{ChatId, UserId};

use crate::core::config;
use crate::download::cookies::{diagnose_cookies_content, CredentialStore};
use crate::download::pipeline::{reply, DownloadPipeline, DownloadRequest, RejectReason, RequestOutcome};
use crate::telegram::messages;
use crate::telegram::transport::Transport;

/// A document attached to a message.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_id: String,
    pub file_name: Option<String>,
    /// Size announced by Telegram, in bytes
    pub size: u64,
}

pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    pipeline: DownloadPipeline,
    credentials: Arc<CredentialStore>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>, pipeline: DownloadPipeline, credentials: Arc<CredentialStore>) -> Self {
        Self {
            transport,
            pipeline,
            credentials,
        }
    }

    /// `/start`
    pub async fn on_start(&self, chat: ChatId) -> RequestOutcome {
        reply(self.transport.as_ref(), chat, messages::START).await;
        RequestOutcome::Replied
    }

    /// `/help`
    pub async fn on_help(&self, chat: ChatId) -> RequestOutcome {
        let policy = self.pipeline.policy();
        let text = messages::help(policy.allowed_platforms.as_deref(), policy.max_file_size);
        reply(self.transport.as_ref(), chat, &text).await;
        RequestOutcome::Replied
    }

    /// Any non-command text: treated as a video link.
    pub async fn on_text(&self, user: UserId, chat: ChatId, text: &str) -> RequestOutcome {
        let request = DownloadRequest {
            user,
            chat,
            text: text.to_string(),
        };
        self.pipeline.run(self.transport.as_ref(), &request).await
    }

    /// A document upload; only `cookies.txt` is accepted.
    pub async fn on_document(&self, user: UserId, chat: ChatId, document: &DocumentUpload) -> RequestOutcome {
        let transport = self.transport.as_ref();

        if document.file_name.as_deref() != Some(config::cookies::UPLOAD_FILE_NAME) {
            log::info!(
                "🚫 User {} uploaded {:?}, expected {}",
                user.0,
                document.file_name,
                config::cookies::UPLOAD_FILE_NAME
            );
            reply(transport, chat, messages::COOKIES_WRONG_NAME).await;
            return RequestOutcome::Rejected(RejectReason::WrongFileName);
        }

        if document.size > config::cookies::MAX_UPLOAD_BYTES {
            reply(transport, chat, &messages::cookies_too_large(document.size)).await;
            return RequestOutcome::Rejected(RejectReason::FileTooLarge);
        }

        let content = match transport.fetch_document(&document.file_id).await {
            Ok(content) => content,
            Err(e) => {
                log::error!("❌ Failed to download cookies.txt from user {}: {}", user.0, e);
                reply(transport, chat, messages::COOKIES_SAVE_FAILED).await;
                return RequestOutcome::Replied;
            }
        };

        if content.is_empty() {
            reply(transport, chat, messages::COOKIES_EMPTY).await;
            return RequestOutcome::Rejected(RejectReason::EmptyFile);
        }
        if content.len() as u64 > config::cookies::MAX_UPLOAD_BYTES {
            reply(transport, chat, &messages::cookies_too_large(content.len() as u64)).await;
            return RequestOutcome::Rejected(RejectReason::FileTooLarge);
        }

        let diagnostic = diagnose_cookies_content(&content);
        if let Err(e) = self.credentials.save(user, &content).await {
            log::error!("❌ Failed to store cookies for user {}: {}", user.0, e);
            reply(transport, chat, messages::COOKIES_SAVE_FAILED).await;
            return RequestOutcome::Replied;
        }

        log::info!(
            "🍪 Stored cookies for user {} ({} bytes, {} cookie lines, header: {})",
            user.0,
            content.len(),
            diagnostic.total_cookies,
            diagnostic.has_header
        );
        let text = if diagnostic.looks_valid() {
            messages::COOKIES_SAVED
        } else if !diagnostic.has_header {
            messages::COOKIES_SAVED_NO_HEADER
        } else {
            messages::COOKIES_SAVED_NO_ENTRIES
        };
        reply(transport, chat, text).await;
        RequestOutcome::Replied
    }

    /// `/forgetcookies`
    pub async fn on_forget_cookies(&self, user: UserId, chat: ChatId) -> RequestOutcome {
        let text = match self.credentials.remove(user).await {
            Ok(true) => messages::COOKIES_REMOVED,
            Ok(false) => messages::NO_COOKIES,
            Err(e) => {
                log::error!("❌ Failed to remove cookies for user {}: {}", user.0, e);
                messages::INTERNAL_ERROR
            }
        };
        reply(self.transport.as_ref(), chat, text).await;
        RequestOutcome::Replied
    }
}
