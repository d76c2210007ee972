use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use vidgrab::chat::{ChatRelay, OpenAiCompatClient};
use vidgrab::core::logging::parse_level;
use vidgrab::core::{config, init_logger, log_startup_configuration, BotConfig, BotMode};
use vidgrab::download::{CredentialStore, DownloadPipeline, DownloadPolicy, YtDlpSource};
use vidgrab::telegram::handlers::{chat_schema, schema, ChatDeps, HandlerDeps, HandlerError};
use vidgrab::telegram::{create_bot, setup_bot_commands, Orchestrator, TeloxideTransport, Transport};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, cookies store).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH, parse_level(&config::LOG_LEVEL))?;

    let config = BotConfig::from_env().context("invalid configuration")?;
    log_startup_configuration(&config);

    let bot = create_bot(&config)?;
    if let Err(e) = setup_bot_commands(&bot, config.mode).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let transport: Arc<dyn Transport> = Arc::new(TeloxideTransport::new(bot.clone()));
    let handler = match config.mode {
        BotMode::Download => download_handler(&config, transport).await?,
        BotMode::Chat => chat_handler(&config, transport)?,
    };

    log::info!("🚀 Bot started in {:?} mode", config.mode);

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

async fn download_handler(config: &BotConfig, transport: Arc<dyn Transport>) -> Result<UpdateHandler<HandlerError>> {
    let credentials = Arc::new(
        CredentialStore::open(&config.cookies_dir, config.fallback_cookies_file.clone())
            .await
            .with_context(|| format!("cannot open cookies directory {}", config.cookies_dir.display()))?,
    );

    fs_err::create_dir_all(&config.temp_dir)?;

    let source = Arc::new(YtDlpSource::new(config.ytdl_bin.clone(), config.ytdlp_timeout));
    let policy = DownloadPolicy {
        max_file_size: config.max_file_size,
        transcode: config.transcode.clone(),
        allowed_platforms: config.allowed_platforms.clone(),
    };
    let pipeline = DownloadPipeline::new(
        source,
        credentials.clone(),
        policy,
        config.temp_dir.clone(),
        config.max_concurrent_downloads,
    )
    .with_verbose(config.ytdl_verbose);

    let orchestrator = Arc::new(Orchestrator::new(transport, pipeline, credentials));
    Ok(schema(HandlerDeps::new(orchestrator)))
}

fn chat_handler(config: &BotConfig, transport: Arc<dyn Transport>) -> Result<UpdateHandler<HandlerError>> {
    let llm = config.llm.as_ref().context("chat mode without LLM settings")?;
    let client = Arc::new(OpenAiCompatClient::new(llm)?);
    let relay = Arc::new(ChatRelay::new(transport, client));
    Ok(chat_schema(ChatDeps::new(relay)))
}
