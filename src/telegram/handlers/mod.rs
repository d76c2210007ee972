//! Telegram bot handler tree configuration
//!
//! The handlers only unpack updates and delegate to the orchestrator (download
//! mode) or the chat relay (chat mode).

mod schema;
mod types;

pub use schema::{chat_schema, schema};
pub use types::{document_of, sender_of, ChatDeps, HandlerDeps, HandlerError};
