//! Transport that records every outgoing call instead of talking to Telegram

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;
use teloxide::types::{ChatId, MessageId};

use vidgrab::telegram::{Transport, TransportError};

/// One recorded outgoing call
#[derive(Debug, Clone, PartialEq)]
pub enum SentEvent {
    Text {
        chat: ChatId,
        id: MessageId,
        text: String,
    },
    Video {
        chat: ChatId,
        path: PathBuf,
        caption: String,
        /// Size of the file at the moment it was handed over
        size: u64,
    },
    Deleted {
        chat: ChatId,
        id: MessageId,
    },
}

#[derive(Default)]
pub struct MockTransport {
    events: Mutex<Vec<SentEvent>>,
    documents: Mutex<HashMap<String, Vec<u8>>>,
    next_id: AtomicI32,
    fail_videos: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `send_video` fail.
    pub fn fail_videos(&self) {
        self.fail_videos.store(true, Ordering::SeqCst);
    }

    /// Registers a file the bot can fetch with `fetch_document`.
    pub fn add_document(&self, file_id: &str, content: &[u8]) {
        self.documents
            .lock()
            .unwrap()
            .insert(file_id.to_string(), content.to_vec());
    }

    pub fn events(&self) -> Vec<SentEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SentEvent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<(PathBuf, String, u64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SentEvent::Video { path, caption, size, .. } => Some((path, caption, size)),
                _ => None,
            })
            .collect()
    }

    /// Number of text messages equal to `text`.
    pub fn count_text(&self, text: &str) -> usize {
        self.texts().iter().filter(|t| t.as_str() == text).count()
    }

    /// Ids of messages with exactly `text`.
    pub fn ids_of(&self, text: &str) -> Vec<MessageId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SentEvent::Text { id, text: t, .. } if t == text => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SentEvent::Deleted { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError> {
        let id = self.next_message_id();
        self.events.lock().unwrap().push(SentEvent::Text {
            chat,
            id,
            text: text.to_string(),
        });
        Ok(id)
    }

    async fn send_video(&self, chat: ChatId, path: &Path, caption: &str) -> Result<MessageId, TransportError> {
        if self.fail_videos.load(Ordering::SeqCst) {
            return Err(TransportError::Other("upload rejected".to_string()));
        }
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        self.events.lock().unwrap().push(SentEvent::Video {
            chat,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            size,
        });
        Ok(self.next_message_id())
    }

    async fn delete_message(&self, chat: ChatId, id: MessageId) -> Result<(), TransportError> {
        self.events.lock().unwrap().push(SentEvent::Deleted { chat, id });
        Ok(())
    }

    async fn fetch_document(&self, file_id: &str) -> Result<Vec<u8>, TransportError> {
        self.documents
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| TransportError::Other(format!("unknown file {}", file_id)))
    }
}
