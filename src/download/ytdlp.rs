//! YtDlpSource: the yt-dlp backed implementation of [`DownloadSource`].
//!
//! yt-dlp is run once per request with `--print-json --no-simulate`, so the
//! metadata arrives on stdout while the file is written into the request
//! directory. Transcoding is delegated to yt-dlp's ffmpeg post-processor.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use url::Url;

use crate::core::config;
use crate::core::process::run_with_timeout;
use crate::download::error::DownloadError;
use crate::download::source::{DownloadSource, ExtractOptions, ExtractionResult};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, classify_failure, get_fix_recommendations};

/// Extensions of files yt-dlp leaves behind while working.
const INTERMEDIATE_EXTENSIONS: &[&str] = &["part", "ytdl", "json", "temp", "tmp"];

/// Subset of the `--print-json` document we care about.
#[derive(Debug, Default, Deserialize)]
struct YtDlpInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    filesize: Option<u64>,
    #[serde(default)]
    filesize_approx: Option<f64>,
}

impl YtDlpInfo {
    fn announced_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx.map(|s| s as u64))
    }
}

/// Download source powered by the yt-dlp binary.
pub struct YtDlpSource {
    bin: String,
    timeout: Duration,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new("yt-dlp", config::download::ytdlp_timeout())
    }
}

impl YtDlpSource {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    /// Command-line arguments for one run.
    pub fn build_args(url: &Url, options: &ExtractOptions) -> Vec<String> {
        let mut args = vec![
            "--format".to_string(),
            options.format.clone(),
            "-o".to_string(),
            options.output_path_template().to_string_lossy().into_owned(),
            "--no-playlist".to_string(),
        ];

        if let Some(limit) = options.max_file_size {
            args.push("--max-filesize".to_string());
            args.push(limit.to_string());
        }

        if let Some(profile) = &options.transcode {
            args.push("--recode-video".to_string());
            args.push(profile.container.clone());
            args.push("--postprocessor-args".to_string());
            args.push(format!("VideoConvertor:{}", profile.ffmpeg_args()));
        }

        args.push(if options.verbose { "--verbose" } else { "--quiet" }.to_string());

        if let Some(cookies) = &options.cookies {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }

        args.push("--print-json".to_string());
        args.push("--no-simulate".to_string());
        args.push(url.as_str().to_string());
        args
    }
}

#[async_trait]
impl DownloadSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn download(&self, url: &Url, options: &ExtractOptions) -> Result<ExtractionResult, DownloadError> {
        let args = Self::build_args(url, options);
        log::debug!("▶️ {} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args);
        let output = run_with_timeout(&mut cmd, self.timeout).await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let error_type = analyze_ytdlp_error(&stderr);
            log::error!("❌ yt-dlp failed for {} ({:?}): {}", url, error_type, stderr.trim());
            log::info!("🔧 {}", get_fix_recommendations(error_type));
            return Err(classify_failure(&stderr, options.max_file_size));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = parse_info(&stdout);
        let title = info
            .title
            .clone()
            .or_else(|| info.id.clone())
            .unwrap_or_else(|| "video".to_string());

        let Some(path) = find_downloaded_file(&options.output_dir).await? else {
            // yt-dlp exits 0 when it skips a file over --max-filesize; its
            // notice goes to stdout, which --quiet and --print-json suppress
            if let Some(limit) = options.max_file_size {
                let size = info.announced_size().unwrap_or(0);
                log::warn!("📏 yt-dlp produced no file for {} under a {} byte limit", url, limit);
                return Err(DownloadError::TooLarge { size, limit });
            }
            return Err(DownloadError::FileNotFound(format!(
                "yt-dlp produced no file in {}",
                options.output_dir.display()
            )));
        };

        let result = ExtractionResult::from_file(&title, &path)
            .await
            .map_err(|e| DownloadError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "✅ yt-dlp finished: {:?} ({} bytes, .{})",
            result.title,
            result.file_size,
            result.ext
        );
        Ok(result)
    }
}

/// The last JSON line on stdout; yt-dlp may print warnings before it.
fn parse_info(stdout: &str) -> YtDlpInfo {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|l| l.starts_with('{'))
        .find_map(|l| serde_json::from_str(l).ok())
        .unwrap_or_default()
}

/// Finds the produced media file, ignoring leftovers of interrupted steps.
///
/// When several candidates exist (e.g. the original next to the recoded one),
/// the largest wins.
async fn find_downloaded_file(dir: &Path) -> Result<Option<PathBuf>, DownloadError> {
    let mut entries = fs_err::tokio::read_dir(dir)
        .await
        .map_err(|e| DownloadError::FileNotFound(e.to_string()))?;

    let mut best: Option<(u64, PathBuf)> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DownloadError::FileNotFound(e.to_string()))?
    {
        let path = entry.path();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if INTERMEDIATE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        if best.as_ref().map_or(true, |(size, _)| meta.len() > *size) {
            best = Some((meta.len(), path));
        }
    }

    Ok(best.map(|(_, path)| path))
}
