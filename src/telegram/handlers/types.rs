//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::{Message, UserId};

use crate::chat::ChatRelay;
use crate::telegram::orchestrator::{DocumentUpload, Orchestrator};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies of the download bot handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub orchestrator: Arc<Orchestrator>,
}

impl HandlerDeps {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Dependencies of the chat-mode handlers
#[derive(Clone)]
pub struct ChatDeps {
    pub relay: Arc<ChatRelay>,
}

impl ChatDeps {
    pub fn new(relay: Arc<ChatRelay>) -> Self {
        Self { relay }
    }
}

/// Sender of a message. Channel posts carry no sender; the chat id stands in.
pub fn sender_of(msg: &Message) -> UserId {
    msg.from
        .as_ref()
        .map(|u| u.id)
        .unwrap_or_else(|| UserId(msg.chat.id.0.unsigned_abs()))
}

/// Extracts the attached document, if any.
pub fn document_of(msg: &Message) -> Option<DocumentUpload> {
    msg.document().map(|doc| DocumentUpload {
        file_id: doc.file.id.0.clone(),
        file_name: doc.file_name.clone(),
        size: u64::from(doc.file.size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn private_message(extra: serde_json::Value) -> Message {
        let mut msg = json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": { "id": 42, "type": "private", "first_name": "Ann" },
            "from": { "id": 7, "is_bot": false, "first_name": "Ann" }
        });
        if let (Some(obj), Some(extra)) = (msg.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        serde_json::from_value(msg).unwrap()
    }

    #[test]
    fn test_sender_of_uses_from() {
        let msg = private_message(json!({ "text": "hi" }));
        assert_eq!(sender_of(&msg), UserId(7));
    }

    #[test]
    fn test_sender_of_channel_post_falls_back_to_chat() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 3,
            "date": 1_700_000_000,
            "chat": { "id": -1001234, "type": "channel", "title": "News" },
            "text": "https://youtu.be/abc"
        }))
        .unwrap();
        assert_eq!(sender_of(&msg), UserId(1001234));
    }

    #[test]
    fn test_document_of() {
        let msg = private_message(json!({
            "document": {
                "file_id": "BQACAgIAAxk",
                "file_unique_id": "AgADxyz",
                "file_name": "cookies.txt",
                "file_size": 321
            }
        }));
        let doc = document_of(&msg).unwrap();
        assert_eq!(doc.file_id, "BQACAgIAAxk");
        assert_eq!(doc.file_name.as_deref(), Some("cookies.txt"));
        assert_eq!(doc.size, 321);
    }

    #[test]
    fn test_document_of_text_message() {
        let msg = private_message(json!({ "text": "cookies.txt" }));
        assert!(document_of(&msg).is_none());
    }
}
