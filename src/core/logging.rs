//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup diagnostics for the loaded configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config::{BotConfig, BotMode};

/// Parses a textual log level, falling back to `Info` for unknown values.
pub fn parse_level(raw: &str) -> LevelFilter {
    match raw.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `level` - Level applied to both outputs
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already installed
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    // Dependencies are chatty at debug level; keep our own crate only.
    let config = ConfigBuilder::new()
        .add_filter_allow_str("vidgrab")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, config, log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup.
///
/// Secrets (bot token, API key) are never printed.
pub fn log_startup_configuration(config: &BotConfig) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🚀 vidgrab {} starting", env!("CARGO_PKG_VERSION"));
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match config.mode {
        BotMode::Download => log_download_configuration(config),
        BotMode::Chat => {
            log::info!("💬 Mode: chat relay");
            if let Some(llm) = &config.llm {
                log::info!("   Endpoint: {}", llm.api_base);
                log::info!("   Model: {} (temperature {}, max_tokens {})", llm.model, llm.temperature, llm.max_tokens);
            }
        }
    }

    if let Some(url) = &config.bot_api_url {
        log::info!("🌐 Custom Bot API URL: {}", url);
    }
}

fn log_download_configuration(config: &BotConfig) {
    log::info!("📥 Mode: video downloader");
    log::info!("   yt-dlp binary: {}", config.ytdl_bin);
    log::info!("   Timeout: {}s", config.ytdlp_timeout.as_secs());
    log::info!("   Concurrent downloads: {}", config.max_concurrent_downloads);
    log::info!("   Temp dir: {}", config.temp_dir.display());

    match config.max_file_size {
        Some(limit) => log::info!("   Size ceiling: {} MB", limit / (1024 * 1024)),
        None => log::warn!("⚠️  Size ceiling disabled (MAX_FILE_SIZE_MB=0)"),
    }

    match &config.transcode {
        Some(profile) => log::info!("   Transcode: {}", profile.describe()),
        None => log::info!("   Transcode: off"),
    }

    match &config.allowed_platforms {
        Some(platforms) => {
            let names: Vec<&str> = platforms.iter().map(|p| p.name.as_str()).collect();
            log::info!("   Allowed platforms: {}", names.join(", "));
        }
        None => log::warn!("⚠️  Allow-list disabled (ALLOWED_DOMAINS=*), any host is accepted"),
    }

    log::info!("🍪 Per-user cookies dir: {}", config.cookies_dir.display());
    match &config.fallback_cookies_file {
        Some(path) if path.exists() => log::info!("✅ YTDL_COOKIES_FILE: {}", path.display()),
        Some(path) => {
            log::error!("❌ YTDL_COOKIES_FILE: {} (FILE NOT FOUND!)", path.display());
            log::error!("   Sign-in gated videos will fail unless users upload cookies.txt");
        }
        None => log::info!("   YTDL_COOKIES_FILE: not set (users can upload cookies.txt)"),
    }
}
