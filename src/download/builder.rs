//! Builder pattern for extraction options.
//!
//! Provides a fluent API for constructing `ExtractOptions` instances
//! with sensible defaults.

use std::path::PathBuf;

use crate::download::source::{ExtractOptions, TranscodeProfile};

/// Builder for constructing extraction options.
///
/// # Example
///
/// ```ignore
/// let options = ExtractOptionsBuilder::new(request_dir.path())
///     .max_file_size(50 * 1024 * 1024)
///     .transcode(Some(TranscodeProfile::default()))
///     .cookies(credentials.cookies_for(user_id))
///     .build();
/// ```
pub struct ExtractOptionsBuilder {
    options: ExtractOptions,
}

impl ExtractOptionsBuilder {
    /// Create a new builder writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            options: ExtractOptions::new(output_dir),
        }
    }

    /// Set maximum allowed file size in bytes.
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.options.max_file_size = Some(size);
        self
    }

    /// Set or clear the maximum file size.
    pub fn max_file_size_opt(mut self, size: Option<u64>) -> Self {
        self.options.max_file_size = size;
        self
    }

    /// Enable or disable the re-encode step.
    pub fn transcode(mut self, profile: Option<TranscodeProfile>) -> Self {
        self.options.transcode = profile;
        self
    }

    /// Use a cookies file for this run.
    pub fn cookies(mut self, path: Option<PathBuf>) -> Self {
        self.options.cookies = path;
        self
    }

    /// Switch the extractor to verbose logging.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    pub fn build(self) -> ExtractOptions {
        self.options
    }
}
