//! vidgrab - Telegram bot that turns video links into video messages
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, process and validation helpers
//! - `download`: yt-dlp extraction, per-user cookies and the request pipeline
//! - `telegram`: Transport, orchestrator and dispatcher handlers
//! - `chat`: Optional language-model chat relay mode

pub mod chat;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, BotConfig};
pub use download::{DownloadPipeline, RequestOutcome};
pub use telegram::{Orchestrator, Transport};
