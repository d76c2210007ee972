//! Download source abstraction.
//!
//! The `DownloadSource` trait is the seam between the request pipeline and the
//! external extraction tool. The production backend is `YtDlpSource`; tests
//! plug in in-memory fakes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

use crate::core::config;
use crate::download::error::DownloadError;

/// Re-encode profile applied after download so every file plays inline in Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeProfile {
    /// Target container (e.g. "mp4")
    pub container: String,
    /// ffmpeg video codec (e.g. "libx264")
    pub video_codec: String,
    /// Constant rate factor
    pub crf: u8,
    /// x264 preset (e.g. "faster")
    pub preset: String,
    /// ffmpeg audio codec (e.g. "aac")
    pub audio_codec: String,
    /// Audio bitrate (e.g. "128k")
    pub audio_bitrate: String,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            container: "mp4".to_string(),
            video_codec: "libx264".to_string(),
            crf: 28,
            preset: "faster".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl TranscodeProfile {
    /// ffmpeg arguments for the conversion step.
    pub fn ffmpeg_args(&self) -> String {
        format!(
            "-c:v {} -crf {} -preset {} -c:a {} -b:a {}",
            self.video_codec, self.crf, self.preset, self.audio_codec, self.audio_bitrate
        )
    }

    /// Short description for startup logs.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.container, self.ffmpeg_args())
    }
}

/// Everything the extractor needs to know for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Format selector (e.g. "best")
    pub format: String,
    /// Directory the file is written to; owned by the request
    pub output_dir: PathBuf,
    /// Output template, relative to `output_dir`
    pub output_template: String,
    /// Maximum allowed file size in bytes
    pub max_file_size: Option<u64>,
    /// Optional re-encode step
    pub transcode: Option<TranscodeProfile>,
    /// Netscape cookies file used for sign-in gated content
    pub cookies: Option<PathBuf>,
    /// Verbose extractor logging instead of quiet
    pub verbose: bool,
}

impl ExtractOptions {
    /// Defaults for a request writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format: config::download::FORMAT_SELECTOR.to_string(),
            output_dir: output_dir.into(),
            output_template: config::download::OUTPUT_TEMPLATE.to_string(),
            max_file_size: None,
            transcode: None,
            cookies: None,
            verbose: false,
        }
    }

    /// Full output path template handed to the extractor.
    pub fn output_path_template(&self) -> PathBuf {
        self.output_dir.join(&self.output_template)
    }
}

/// What a successful extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Media title reported by the extractor
    pub title: String,
    /// Extension of the produced file (e.g. "mp4")
    pub ext: String,
    /// Path of the produced file inside the request directory
    pub file_path: PathBuf,
    /// File size in bytes
    pub file_size: u64,
}

impl ExtractionResult {
    /// Builds a result from a file on disk, reading its size and extension.
    pub async fn from_file(title: &str, file_path: &Path) -> std::io::Result<Self> {
        let file_size = fs_err::tokio::metadata(file_path).await?.len();
        let ext = file_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(Self {
            title: title.to_string(),
            ext,
            file_path: file_path.to_path_buf(),
            file_size,
        })
    }
}

/// Trait for download source implementations.
///
/// Implementations must classify failures into a structured `DownloadError`
/// so callers never inspect error text.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Human-readable name of this source (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Download `url` according to `options`, writing only inside `options.output_dir`.
    async fn download(&self, url: &Url, options: &ExtractOptions) -> Result<ExtractionResult, DownloadError>;
}
