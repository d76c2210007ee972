use thiserror::Error;

use crate::core::process::ProcessError;

/// Structured error type for download operations.
///
/// Produced at the extractor boundary; everything downstream matches on
/// [`DownloadErrorKind`] instead of reading messages.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Video is private, removed or otherwise not retrievable
    #[error("video unavailable: {0}")]
    Unavailable(String),
    /// The site requires a signed-in session (cookies)
    #[error("sign-in required: {0}")]
    SignInRequired(String),
    /// Produced or announced file exceeds the size ceiling
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    /// Connection, DNS or HTTP transport failure
    #[error("network error: {0}")]
    Network(String),
    /// Geo-restricted content
    #[error("region restricted: {0}")]
    RegionLocked(String),
    /// Extractor process could not be run or timed out
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// Expected file not found after the extractor finished
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// Catch-all for uncategorized errors
    #[error("{0}")]
    Other(String),
}

/// Category of a download failure, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadErrorKind {
    Unavailable,
    SignInRequired,
    TooLarge,
    Network,
    RegionLocked,
    Timeout,
    Unknown,
}

impl DownloadError {
    pub fn kind(&self) -> DownloadErrorKind {
        match self {
            DownloadError::Unavailable(_) => DownloadErrorKind::Unavailable,
            DownloadError::SignInRequired(_) => DownloadErrorKind::SignInRequired,
            DownloadError::TooLarge { .. } => DownloadErrorKind::TooLarge,
            DownloadError::Network(_) => DownloadErrorKind::Network,
            DownloadError::RegionLocked(_) => DownloadErrorKind::RegionLocked,
            DownloadError::Process(ProcessError::TimedOut { .. }) => DownloadErrorKind::Timeout,
            DownloadError::Process(_) | DownloadError::FileNotFound(_) | DownloadError::Other(_) => {
                DownloadErrorKind::Unknown
            }
        }
    }

    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Unavailable(_) => "unavailable",
            DownloadError::SignInRequired(_) => "sign_in",
            DownloadError::TooLarge { .. } => "too_large",
            DownloadError::Network(_) => "network",
            DownloadError::RegionLocked(_) => "region",
            DownloadError::Process(ProcessError::TimedOut { .. }) => "timeout",
            DownloadError::Process(_) => "process",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::Other(_) => "other",
        }
    }
}
