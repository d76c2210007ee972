//! User-facing texts.

use indoc::{formatdoc, indoc};

use crate::chat::LlmErrorKind;
use crate::core::config;
use crate::core::validation::Platform;
use crate::download::error::DownloadErrorKind;

pub const START: &str = indoc! {"
    👋 Hi! Send me a link to a video and I'll download it for you.

    If a site asks you to sign in, upload your cookies.txt file here.
    /help shows everything I can do.
"};

pub const CHAT_START: &str = indoc! {"
    👋 Hi! Ask me anything and I'll forward it to the language model.
"};

pub const IN_PROGRESS: &str = "⏳ Downloading your video...";

pub const THINKING: &str = "💭 Thinking...";

pub const INVALID_URL: &str = "❌ That doesn't look like a link. Send me a video URL starting with http:// or https://";

pub const SEND_FAILED: &str = "❌ The video was downloaded but Telegram refused the upload. Please try again later.";

pub const INTERNAL_ERROR: &str = "❌ Something went wrong on my side. Please try again later.";

pub const COOKIES_WRONG_NAME: &str = indoc! {"
    ❌ I only accept a file named exactly cookies.txt.

    Export your browser cookies in Netscape format (for example with the
    \"Get cookies.txt LOCALLY\" extension) and send the file as a document.
"};

pub const COOKIES_EMPTY: &str = "❌ That cookies.txt is empty.";

pub const COOKIES_SAVED: &str = "✅ Cookies saved. They'll be used for your next downloads.";

pub const COOKIES_SAVED_NO_ENTRIES: &str = indoc! {"
    ✅ Cookies saved.

    ⚠️ No cookie lines were found in the file. Make sure you exported the
    cookies while signed in to the site.
"};

pub const COOKIES_SAVED_NO_HEADER: &str = indoc! {"
    ✅ Cookies saved.

    ⚠️ The file has no \"# Netscape HTTP Cookie File\" header, so yt-dlp may
    not accept it. If downloads still ask you to sign in, export the cookies again.
"};

pub const COOKIES_SAVE_FAILED: &str = "❌ Couldn't store your cookies. Please try again later.";

pub const COOKIES_REMOVED: &str = "🗑️ Your cookies were deleted.";

pub const NO_COOKIES: &str = "ℹ️ You have no stored cookies.";

pub fn help(platforms: Option<&[Platform]>, max_file_size: Option<u64>) -> String {
    let limit = max_file_size.map_or("no limit".to_string(), format_size);
    formatdoc! {"
        📖 How to use me

        Send a link to a video and I'll reply with the file.

        Supported sites: {sites}
        Size limit: {limit}

        🍪 Private or age-restricted videos need your cookies:
        export them from your browser in Netscape format and send the file
        named cookies.txt here. /forgetcookies deletes it again.",
        sites = platform_list(platforms),
        limit = limit,
    }
}

pub fn url_too_long(length: usize) -> String {
    format!(
        "❌ That link is too long ({} characters, max {}).",
        length,
        config::validation::MAX_URL_LENGTH
    )
}

pub fn unsupported_host(host: &str, platforms: Option<&[Platform]>) -> String {
    formatdoc! {"
        ❌ I can't download from {host}.

        Supported sites: {sites}",
        host = host,
        sites = platform_list(platforms),
    }
}

/// Text for a failed download.
///
/// `has_own_cookies` switches the sign-in message between "upload cookies" and
/// "your cookies look expired".
pub fn download_failed(kind: DownloadErrorKind, has_own_cookies: bool, limit: Option<u64>) -> String {
    match kind {
        DownloadErrorKind::Unavailable => {
            "❌ This video is unavailable. It may be private, deleted or the link is wrong.".to_string()
        }
        DownloadErrorKind::SignInRequired if has_own_cookies => indoc! {"
            🔒 The site still asks to sign in even with your cookies.

            They have probably expired. Export fresh cookies and upload a new cookies.txt.
        "}
        .to_string(),
        DownloadErrorKind::SignInRequired => indoc! {"
            🔒 This video requires signing in.

            Export your browser cookies in Netscape format and send them here as a
            file named cookies.txt, then send the link again.
        "}
        .to_string(),
        DownloadErrorKind::TooLarge => match limit {
            Some(limit) => format!("❌ The video is larger than the {} limit.", format_size(limit)),
            None => "❌ The video is too large.".to_string(),
        },
        DownloadErrorKind::Network => "❌ Network problem while downloading. Try again in a minute.".to_string(),
        DownloadErrorKind::RegionLocked => "❌ This video isn't available in the bot's region.".to_string(),
        DownloadErrorKind::Timeout => "⏱️ The download took too long and was stopped.".to_string(),
        DownloadErrorKind::Unknown => "❌ Couldn't download this video. Check that the link is correct.".to_string(),
    }
}

pub fn too_large(size: u64, limit: u64) -> String {
    format!(
        "❌ The video is {}, which is over the {} limit.",
        format_size(size),
        format_size(limit)
    )
}

/// Caption for a sent video, cut to Telegram's caption limit.
pub fn caption(title: &str) -> String {
    truncate_chars(&format!("🎬 {}", title), config::telegram::MAX_CAPTION_LENGTH)
}

pub fn cookies_too_large(size: u64) -> String {
    format!(
        "❌ That file is {}; a cookies.txt must be at most {}.",
        format_size(size),
        format_size(config::cookies::MAX_UPLOAD_BYTES)
    )
}

pub fn llm_failed(kind: LlmErrorKind) -> String {
    match kind {
        LlmErrorKind::Network => "❌ Couldn't reach the language model. Try again later.".to_string(),
        LlmErrorKind::Api => "❌ The language model returned an error. Try again later.".to_string(),
        LlmErrorKind::EmptyReply => "🤷 The language model returned an empty answer.".to_string(),
    }
}

fn platform_list(platforms: Option<&[Platform]>) -> String {
    match platforms {
        None => "any site yt-dlp supports".to_string(),
        Some(platforms) => platforms
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Human-readable size (`52428800` -> `50 MB`).
pub fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    if bytes >= MIB {
        let mib = bytes as f64 / MIB as f64;
        if bytes % MIB == 0 {
            format!("{} MB", bytes / MIB)
        } else {
            format!("{:.1} MB", mib)
        }
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{} B", bytes)
    }
}

/// Cuts `text` to at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Splits `text` into chunks of at most `max` characters, preferring line breaks.
pub fn split_message(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                let piece: String = piece.iter().collect();
                if piece.chars().count() == max {
                    chunks.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current = piece;
                }
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
