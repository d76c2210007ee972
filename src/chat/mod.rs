//! Chat-completion run mode.
//!
//! Same request shape as the downloader: one progress notice, one call to the
//! language model, the answer relayed in Telegram-sized chunks, notice deleted.

mod client;

use std::sync::Arc;
use teloxide::types::{ChatId, UserId};

use crate::core::config;
use crate::download::pipeline::{delete_notice, reply, RequestOutcome};
use crate::telegram::messages;
use crate::telegram::transport::Transport;

pub use client::{InferenceClient, LlmError, LlmErrorKind, OpenAiCompatClient};

pub struct ChatRelay {
    transport: Arc<dyn Transport>,
    client: Arc<dyn InferenceClient>,
}

impl ChatRelay {
    pub fn new(transport: Arc<dyn Transport>, client: Arc<dyn InferenceClient>) -> Self {
        Self { transport, client }
    }

    pub async fn on_start(&self, chat: ChatId) -> RequestOutcome {
        reply(self.transport.as_ref(), chat, messages::CHAT_START).await;
        RequestOutcome::Replied
    }

    /// Forwards `text` to the model and relays the answer.
    pub async fn on_text(&self, user: UserId, chat: ChatId, text: &str) -> RequestOutcome {
        let transport = self.transport.as_ref();

        let notice = match transport.send_text(chat, messages::THINKING).await {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Failed to send progress message to chat {}: {}", chat.0, e);
                None
            }
        };

        match self.client.complete(text).await {
            Ok(answer) => {
                log::info!("💬 Answered user {} ({} chars)", user.0, answer.chars().count());
                for chunk in messages::split_message(&answer, config::telegram::MAX_MESSAGE_LENGTH) {
                    reply(transport, chat, &chunk).await;
                }
            }
            Err(e) => {
                log::error!("❌ LLM request for user {} failed: {}", user.0, e);
                reply(transport, chat, &messages::llm_failed(e.kind())).await;
            }
        }

        if let Some(id) = notice {
            delete_notice(transport, chat, id).await;
        }
        RequestOutcome::Replied
    }
}
