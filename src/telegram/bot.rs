//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command registration in the Telegram UI

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config::{self, BotConfig, BotMode};
use crate::core::error::AppResult;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "greeting")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "delete your uploaded cookies.txt")]
    ForgetCookies,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Errors
/// Fails when `BOT_API_URL` is not a valid URL or the HTTP client cannot be built.
pub fn create_bot(config: &BotConfig) -> AppResult<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config.bot_token.expose_secret(), client);

    let bot = match &config.bot_api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).inspect_err(|e| log::error!("Invalid BOT_API_URL {}: {}", bot_api_url, e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Commands shown in the Telegram UI for `mode`.
pub fn commands_for(mode: BotMode) -> Vec<BotCommand> {
    match mode {
        BotMode::Download => Command::bot_commands(),
        BotMode::Chat => vec![BotCommand::new("start", "greeting")],
    }
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot, mode: BotMode) -> AppResult<()> {
    bot.set_my_commands(commands_for(mode)).await?;
    Ok(())
}
