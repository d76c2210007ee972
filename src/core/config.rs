use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::AppError;
use crate::core::validation::{default_platforms, Platform};
use crate::download::source::TranscodeProfile;

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
///
/// Kept outside `BotConfig` because the logger starts before configuration is loaded.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Log level for both console and file output
/// Read from LOG_LEVEL environment variable (error, warn, info, debug, trace)
/// Default: info
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Download configuration
pub mod download {
    use super::Duration;

    /// Default ceiling for produced files (in MiB)
    pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

    /// Timeout for yt-dlp runs (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 240;

    /// Maximum number of concurrent extractor runs
    pub const MAX_CONCURRENT_DOWNLOADS: usize = 2;

    /// Format selector handed to yt-dlp
    pub const FORMAT_SELECTOR: &str = "best";

    /// Output template, relative to the request directory
    pub const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";

    /// Prefix of request-scoped temporary directories
    pub const TEMP_DIR_PREFIX: &str = "vidgrab-";

    /// yt-dlp command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram HTTP requests (in seconds)
    /// Large enough for 50 MB uploads on slow links
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Input validation limits
pub mod validation {
    /// Maximum accepted URL length (in characters)
    pub const MAX_URL_LENGTH: usize = 2048;
}

/// Credential (cookies.txt) handling
pub mod cookies {
    /// The only document name accepted as a credential upload
    pub const UPLOAD_FILE_NAME: &str = "cookies.txt";

    /// Upper bound for an uploaded cookies file (1 MiB)
    pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

    /// Default root of the per-user credential store
    pub const DEFAULT_DIR: &str = "cookies";
}

/// Telegram limits
pub mod telegram {
    /// Maximum length of one text message
    pub const MAX_MESSAGE_LENGTH: usize = 4096;

    /// Maximum length of a media caption
    pub const MAX_CAPTION_LENGTH: usize = 1024;
}

/// Language-model (chat mode) configuration
pub mod llm {
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_SYSTEM_PROMPT: &str =
        "You are a helpful assistant inside a Telegram chat. Answer concisely and in the language of the user.";
}

/// Which bot runs in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    /// Video downloader (default)
    Download,
    /// Language-model chat relay
    Chat,
}

impl BotMode {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "" | "download" | "downloader" => Ok(BotMode::Download),
            "chat" | "llm" => Ok(BotMode::Chat),
            other => Err(AppError::Config(format!(
                "BOT_MODE must be `download` or `chat`, got `{}`",
                other
            ))),
        }
    }
}

/// Settings of the chat-completion run mode
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub timeout: Duration,
}

/// Everything the bot reads from the environment, loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub mode: BotMode,
    pub bot_token: SecretString,
    pub bot_api_url: Option<String>,
    pub ytdl_bin: String,
    pub ytdl_verbose: bool,
    pub fallback_cookies_file: Option<PathBuf>,
    pub cookies_dir: PathBuf,
    pub temp_dir: PathBuf,
    /// `None` disables the ceiling
    pub max_file_size: Option<u64>,
    /// `None` disables the re-encode step
    pub transcode: Option<TranscodeProfile>,
    /// `None` accepts any host
    pub allowed_platforms: Option<Vec<Platform>>,
    pub max_concurrent_downloads: usize,
    pub ytdlp_timeout: Duration,
    /// Present only in chat mode
    pub llm: Option<LlmConfig>,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the bot token is missing, when chat mode
    /// is selected without `LLM_API_KEY`, or when a value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`BotConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .or_else(|| get("TELEGRAM_TOKEN"))
            .ok_or_else(|| AppError::Config("BOT_TOKEN (or TELOXIDE_TOKEN, TELEGRAM_TOKEN) is not set".to_string()))?;

        let mode = BotMode::parse(&get("BOT_MODE").unwrap_or_default())?;

        let max_file_size_mb = parse_or(get("MAX_FILE_SIZE_MB"), "MAX_FILE_SIZE_MB", download::DEFAULT_MAX_FILE_SIZE_MB)?;
        let max_file_size = match max_file_size_mb {
            0 => None,
            mb => Some(mb.checked_mul(1024 * 1024).ok_or_else(|| {
                AppError::Config(format!("MAX_FILE_SIZE_MB is too large: `{}`", mb))
            })?),
        };

        let transcode = parse_bool(get("TRANSCODE"), "TRANSCODE", true)?.then(TranscodeProfile::default);

        let allowed_platforms = match get("ALLOWED_DOMAINS") {
            None => Some(default_platforms()),
            Some(raw) if raw == "*" => None,
            Some(raw) => Some(Platform::from_domain_list(&raw)),
        };

        let max_concurrent_downloads = parse_or(
            get("MAX_CONCURRENT_DOWNLOADS"),
            "MAX_CONCURRENT_DOWNLOADS",
            download::MAX_CONCURRENT_DOWNLOADS,
        )?
        .max(1);

        let ytdlp_timeout = Duration::from_secs(parse_or(
            get("YTDLP_TIMEOUT_SECS"),
            "YTDLP_TIMEOUT_SECS",
            download::YTDLP_TIMEOUT_SECS,
        )?);

        let temp_dir = get("TEMP_FILES_DIR")
            .map(|p| expand_path(&p))
            .unwrap_or_else(env::temp_dir);

        let llm = match mode {
            BotMode::Download => None,
            BotMode::Chat => Some(LlmConfig {
                api_key: SecretString::from(
                    get("LLM_API_KEY")
                        .ok_or_else(|| AppError::Config("LLM_API_KEY is required in chat mode".to_string()))?,
                ),
                api_base: get("LLM_API_BASE").unwrap_or_else(|| llm::DEFAULT_API_BASE.to_string()),
                model: get("LLM_MODEL").unwrap_or_else(|| llm::DEFAULT_MODEL.to_string()),
                temperature: parse_or(get("LLM_TEMPERATURE"), "LLM_TEMPERATURE", llm::DEFAULT_TEMPERATURE)?,
                max_tokens: parse_or(get("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS", llm::DEFAULT_MAX_TOKENS)?,
                system_prompt: get("LLM_SYSTEM_PROMPT").unwrap_or_else(|| llm::DEFAULT_SYSTEM_PROMPT.to_string()),
                timeout: Duration::from_secs(parse_or(
                    get("LLM_TIMEOUT_SECS"),
                    "LLM_TIMEOUT_SECS",
                    llm::DEFAULT_TIMEOUT_SECS,
                )?),
            }),
        };

        Ok(Self {
            mode,
            bot_token: SecretString::from(bot_token),
            bot_api_url: get("BOT_API_URL"),
            ytdl_bin: get("YTDL_BIN").unwrap_or_else(|| "yt-dlp".to_string()),
            ytdl_verbose: parse_bool(get("YTDL_VERBOSE"), "YTDL_VERBOSE", false)?,
            fallback_cookies_file: get("YTDL_COOKIES_FILE").map(|p| expand_path(&p)),
            cookies_dir: expand_path(&get("COOKIES_DIR").unwrap_or_else(|| cookies::DEFAULT_DIR.to_string())),
            temp_dir,
            max_file_size,
            transcode,
            allowed_platforms,
            max_concurrent_downloads,
            ytdlp_timeout,
            llm,
        })
    }
}

/// Expands `~` to the home directory, like the shell would.
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: `{}`", key, raw))),
    }
}

fn parse_bool(value: Option<String>, key: &str, default: bool) -> Result<bool, AppError> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(AppError::Config(format!("{} must be a boolean, got `{}`", key, other))),
    }
}
