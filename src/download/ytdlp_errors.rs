//! yt-dlp stderr analysis.
//!
//! yt-dlp reports failures only as text on stderr. This module is the single
//! place where that text is inspected; it turns stderr into a typed
//! [`YtDlpErrorType`] and then into a [`DownloadError`].

use crate::download::error::DownloadError;

/// Types of yt-dlp errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Login, age gate or bot check; a cookies file may help
    SignInRequired,
    /// Video is private, removed or does not exist
    VideoUnavailable,
    /// Geo-blocked
    RegionLocked,
    /// Larger than `--max-filesize`
    FileTooLarge,
    /// Timeouts, connection, DNS
    NetworkError,
    /// Anything else
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("sign in")
        || stderr_lower.contains("login required")
        || stderr_lower.contains("log in")
        || stderr_lower.contains("confirm your age")
        || stderr_lower.contains("use --cookies")
        || stderr_lower.contains("cookies are no longer valid")
        || stderr_lower.contains("requires authentication")
    {
        return YtDlpErrorType::SignInRequired;
    }

    if stderr_lower.contains("available in your country")
        || stderr_lower.contains("geo restrict")
        || stderr_lower.contains("geo-restrict")
        || stderr_lower.contains("blocked it in your country")
        || stderr_lower.contains("not available from your location")
    {
        return YtDlpErrorType::RegionLocked;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("has been removed")
        || stderr_lower.contains("does not exist")
        || stderr_lower.contains("http error 404")
        || stderr_lower.contains("unsupported url")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("larger than max-filesize") || stderr_lower.contains("file is larger than") {
        return YtDlpErrorType::FileTooLarge;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("temporary failure in name resolution")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Builds the structured error for a failed yt-dlp run.
///
/// `limit` is the configured ceiling, used when yt-dlp itself refused the size.
pub fn classify_failure(stderr: &str, limit: Option<u64>) -> DownloadError {
    let detail = last_error_line(stderr);
    match analyze_ytdlp_error(stderr) {
        YtDlpErrorType::SignInRequired => DownloadError::SignInRequired(detail),
        YtDlpErrorType::VideoUnavailable => DownloadError::Unavailable(detail),
        YtDlpErrorType::RegionLocked => DownloadError::RegionLocked(detail),
        YtDlpErrorType::FileTooLarge => DownloadError::TooLarge {
            size: 0,
            limit: limit.unwrap_or_default(),
        },
        YtDlpErrorType::NetworkError => DownloadError::Network(detail),
        YtDlpErrorType::Unknown => DownloadError::Other(detail),
    }
}

/// Operator hints written to the log next to the failure.
pub fn get_fix_recommendations(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::SignInRequired => {
            "the site wants a signed-in session: ask the user to upload cookies.txt or set YTDL_COOKIES_FILE"
        }
        YtDlpErrorType::VideoUnavailable => "video unavailable, nothing to fix",
        YtDlpErrorType::RegionLocked => "geo-blocked from this host's location",
        YtDlpErrorType::FileTooLarge => "raise MAX_FILE_SIZE_MB if larger files should be accepted",
        YtDlpErrorType::NetworkError => "check connectivity of the host running the bot",
        YtDlpErrorType::Unknown => "check the yt-dlp output above and make sure yt-dlp is up to date",
    }
}

/// The last `ERROR:` line, or the last non-empty line when there is none.
fn last_error_line(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp failed without output".to_string())
}
