//! URL request pipeline.
//!
//! One run handles one text message:
//!   validate URL → allow-list → progress notice → wait for a slot → extract
//!   into a request directory → size check → send → delete notice
//!
//! The request directory is a `TempDir`, so it is removed on every exit path.
//! The progress notice is deleted exactly once after it was sent.

use std::path::PathBuf;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId, UserId};
use tokio::sync::Semaphore;
use url::Url;

use crate::core::config;
use crate::core::validation::{check_allowed_host, validate_url, Platform, ValidationError};
use crate::download::builder::ExtractOptionsBuilder;
use crate::download::cookies::CredentialStore;
use crate::download::error::DownloadErrorKind;
use crate::download::source::{DownloadSource, TranscodeProfile};
use crate::telegram::messages;
use crate::telegram::transport::Transport;

/// What the operator allows the bot to download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPolicy {
    /// `None` disables the ceiling
    pub max_file_size: Option<u64>,
    /// `None` disables the re-encode step
    pub transcode: Option<TranscodeProfile>,
    /// `None` accepts any host
    pub allowed_platforms: Option<Vec<Platform>>,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: Some(config::download::DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024),
            transcode: Some(TranscodeProfile::default()),
            allowed_platforms: Some(crate::core::validation::default_platforms()),
        }
    }
}

/// One inbound text message that should be a video link.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub user: UserId,
    pub chat: ChatId,
    pub text: String,
}

/// Why a message was turned away before any download started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidUrl,
    UnsupportedHost,
    WrongFileName,
    EmptyFile,
    FileTooLarge,
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Media delivered to the chat
    Sent,
    /// Input refused with a usage message
    Rejected(RejectReason),
    /// Extraction or a policy check after it failed
    Failed(DownloadErrorKind),
    /// File was ready but the upload to Telegram failed
    Undelivered,
    /// Plain text reply (commands, cookies uploads, chat answers)
    Replied,
}

pub struct DownloadPipeline {
    source: Arc<dyn DownloadSource>,
    credentials: Arc<CredentialStore>,
    policy: DownloadPolicy,
    temp_root: PathBuf,
    verbose: bool,
    slots: Arc<Semaphore>,
}

impl DownloadPipeline {
    pub fn new(
        source: Arc<dyn DownloadSource>,
        credentials: Arc<CredentialStore>,
        policy: DownloadPolicy,
        temp_root: impl Into<PathBuf>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            credentials,
            policy,
            temp_root: temp_root.into(),
            verbose: false,
            slots: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Run the extractor in verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn policy(&self) -> &DownloadPolicy {
        &self.policy
    }

    /// Handles one text message end to end. Never fails: every problem is
    /// reported to the chat and reflected in the returned outcome.
    pub async fn run(&self, transport: &dyn Transport, request: &DownloadRequest) -> RequestOutcome {
        let chat = request.chat;

        let url = match validate_url(&request.text) {
            Ok(url) => url,
            Err(e) => {
                log::info!("🚫 Rejected message from user {}: {}", request.user.0, e);
                let text = match e {
                    ValidationError::UrlTooLong(length) => messages::url_too_long(length),
                    _ => messages::INVALID_URL.to_string(),
                };
                reply(transport, chat, &text).await;
                return RequestOutcome::Rejected(RejectReason::InvalidUrl);
            }
        };

        let platforms = self.policy.allowed_platforms.as_deref();
        match check_allowed_host(&url, platforms) {
            Ok(platform) => {
                if let Some(p) = platform {
                    log::debug!("🎯 {} matched platform {}", url, p.name);
                }
            }
            Err(e) => {
                log::info!("🚫 Rejected URL from user {}: {}", request.user.0, e);
                let host = url.host_str().unwrap_or_default();
                reply(transport, chat, &messages::unsupported_host(host, platforms)).await;
                return RequestOutcome::Rejected(RejectReason::UnsupportedHost);
            }
        }

        let notice = match transport.send_text(chat, messages::IN_PROGRESS).await {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Failed to send progress message to chat {}: {}", chat.0, e);
                None
            }
        };

        let outcome = self.extract_and_send(transport, request, &url).await;

        if let Some(id) = notice {
            delete_notice(transport, chat, id).await;
        }

        log::info!("📦 Request from user {} for {} finished: {:?}", request.user.0, url, outcome);
        outcome
    }

    async fn extract_and_send(&self, transport: &dyn Transport, request: &DownloadRequest, url: &Url) -> RequestOutcome {
        let chat = request.chat;

        let _slot = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                log::error!("Download slots closed: {}", e);
                reply(transport, chat, messages::INTERNAL_ERROR).await;
                return RequestOutcome::Failed(DownloadErrorKind::Unknown);
            }
        };

        let request_dir = match tempfile::Builder::new()
            .prefix(config::download::TEMP_DIR_PREFIX)
            .tempdir_in(&self.temp_root)
        {
            Ok(dir) => dir,
            Err(e) => {
                log::error!("Failed to create request directory in {}: {}", self.temp_root.display(), e);
                reply(transport, chat, messages::INTERNAL_ERROR).await;
                return RequestOutcome::Failed(DownloadErrorKind::Unknown);
            }
        };

        let has_own_cookies = self.credentials.has_user_cookies(request.user);
        let options = ExtractOptionsBuilder::new(request_dir.path())
            .max_file_size_opt(self.policy.max_file_size)
            .transcode(self.policy.transcode.clone())
            .cookies(self.credentials.cookies_for(request.user))
            .verbose(self.verbose)
            .build();

        log::info!(
            "⬇️ Downloading {} for user {} via {} (cookies: {})",
            url,
            request.user.0,
            self.source.name(),
            options.cookies.is_some()
        );

        let result = match self.source.download(url, &options).await {
            Ok(result) => result,
            Err(e) => {
                let kind = e.kind();
                log::error!("❌ Download failed [{}]: {}", e.subcategory(), e);
                let text = messages::download_failed(kind, has_own_cookies, self.policy.max_file_size);
                reply(transport, chat, &text).await;
                return RequestOutcome::Failed(kind);
            }
        };

        let size = match fs_err::tokio::metadata(&result.file_path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::error!("❌ Extractor reported {} but it is missing: {}", result.file_path.display(), e);
                let text = messages::download_failed(DownloadErrorKind::Unknown, has_own_cookies, None);
                reply(transport, chat, &text).await;
                return RequestOutcome::Failed(DownloadErrorKind::Unknown);
            }
        };

        if let Some(limit) = self.policy.max_file_size {
            if size > limit {
                log::warn!("📏 {} is {} bytes, over the {} byte limit", result.file_path.display(), size, limit);
                reply(transport, chat, &messages::too_large(size, limit)).await;
                return RequestOutcome::Failed(DownloadErrorKind::TooLarge);
            }
        }

        let caption = messages::caption(&result.title);
        let outcome = match transport.send_video(chat, &result.file_path, &caption).await {
            Ok(_) => {
                log::info!("📤 Sent {:?} ({} bytes) to chat {}", result.title, size, chat.0);
                RequestOutcome::Sent
            }
            Err(e) => {
                log::error!("❌ Failed to send {} to chat {}: {}", result.file_path.display(), chat.0, e);
                reply(transport, chat, messages::SEND_FAILED).await;
                RequestOutcome::Undelivered
            }
        };

        if let Err(e) = request_dir.close() {
            log::warn!("Failed to remove request directory: {}", e);
        }
        outcome
    }
}

/// Sends a text reply; failures are logged and swallowed.
pub(crate) async fn reply(transport: &dyn Transport, chat: ChatId, text: &str) {
    if let Err(e) = transport.send_text(chat, text).await {
        log::warn!("Failed to send message to chat {}: {}", chat.0, e);
    }
}

pub(crate) async fn delete_notice(transport: &dyn Transport, chat: ChatId, id: MessageId) {
    if let Err(e) = transport.delete_message(chat, id).await {
        log::warn!("Failed to delete progress message {} in chat {}: {}", id.0, chat.0, e);
    }
}
