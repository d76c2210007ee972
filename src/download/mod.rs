//! Download management and processing

pub mod builder;
pub mod cookies;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use builder::ExtractOptionsBuilder;
pub use cookies::CredentialStore;
pub use error::{DownloadError, DownloadErrorKind};
pub use pipeline::{DownloadPipeline, DownloadPolicy, DownloadRequest, RejectReason, RequestOutcome};
pub use source::{DownloadSource, ExtractOptions, ExtractionResult, TranscodeProfile};
pub use ytdlp::YtDlpSource;
