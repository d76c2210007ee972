//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod process;
pub mod validation;

// Re-exports for convenience
pub use config::{BotConfig, BotMode};
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_startup_configuration};
