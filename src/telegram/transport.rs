//! Outgoing side of the bot.
//!
//! Request handling only talks to the [`Transport`] trait; the production
//! implementation wraps a teloxide `Bot`, tests use an in-memory recorder.

use async_trait::async_trait;
use std::path::Path;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId};
use thiserror::Error;

/// Extensions Telegram plays inline when sent with `sendVideo`.
const INLINE_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v"];

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    #[error("Telegram file download failed: {0}")]
    Download(#[from] teloxide::DownloadError),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a plain text message and returns its id.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError>;

    /// Uploads a local media file with a caption.
    async fn send_video(&self, chat: ChatId, path: &Path, caption: &str) -> Result<MessageId, TransportError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError>;

    /// Downloads a file the user attached to a message.
    async fn fetch_document(&self, file_id: &str) -> Result<Vec<u8>, TransportError>;
}

/// Whether `path` should go out through `sendVideo` rather than `sendDocument`.
pub fn is_inline_video(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| INLINE_VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// [`Transport`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TeloxideTransport {
    bot: Bot,
}

impl TeloxideTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TeloxideTransport {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError> {
        let msg = self.bot.send_message(chat, text).await?;
        Ok(msg.id)
    }

    async fn send_video(&self, chat: ChatId, path: &Path, caption: &str) -> Result<MessageId, TransportError> {
        let msg = if is_inline_video(path) {
            self.bot
                .send_video(chat, InputFile::file(path))
                .caption(caption)
                .supports_streaming(true)
                .await?
        } else {
            log::debug!("📎 {} is not an inline video format, sending as document", path.display());
            self.bot
                .send_document(chat, InputFile::file(path))
                .caption(caption)
                .await?
        };
        Ok(msg.id)
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        self.bot.delete_message(chat, message).await?;
        Ok(())
    }

    async fn fetch_document(&self, file_id: &str) -> Result<Vec<u8>, TransportError> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        let mut buf = Vec::with_capacity(file.size as usize);
        self.bot.download_file(&file.path, &mut buf).await?;
        Ok(buf)
    }
}
