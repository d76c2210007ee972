//! In-memory stand-ins for Telegram and yt-dlp
//!
//! Each integration test binary includes this module with `mod mocks;`, so not
//! every helper is used everywhere.

#![allow(dead_code)]

pub mod mock_llm;
pub mod mock_source;
pub mod mock_transport;

pub use mock_llm::MockInference;
pub use mock_source::{MockSource, SourceBehavior};
pub use mock_transport::{MockTransport, SentEvent};
