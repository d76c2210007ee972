use thiserror::Error;

/// Centralized error types for the application
///
/// Errors that escape a request handler end up here. Request-level failures
/// (bad URL, extractor failure, ...) are answered in the chat and never reach
/// this type; what remains are startup and infrastructure errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
