//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{document_of, sender_of, ChatDeps, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::orchestrator::DocumentUpload;

/// Creates the dispatcher schema for the download bot.
///
/// The same schema is used in production and can be used in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_documents = deps.clone();
    let deps_messages = deps;

    Update::filter_message()
        .branch(command_handler(deps_commands))
        .branch(document_handler(deps_documents))
        .branch(message_handler(deps_messages))
}

/// Creates the dispatcher schema for the chat-completion bot.
pub fn chat_schema(deps: ChatDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps;

    Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(
            move |msg: Message, cmd: Command| {
                let deps = deps_commands.clone();
                async move {
                    log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                    if cmd == Command::Start {
                        deps.relay.on_start(msg.chat.id).await;
                    }
                    Ok(())
                }
            },
        ))
        .branch(
            dptree::filter(|msg: Message| is_plain_text(&msg)).endpoint(move |msg: Message| {
                let deps = deps_messages.clone();
                async move {
                    let text = msg.text().unwrap_or_default();
                    deps.relay.on_text(sender_of(&msg), msg.chat.id, text).await;
                    Ok(())
                }
            }),
        )
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .filter_command::<Command>()
        .endpoint(move |msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                let orchestrator = &deps.orchestrator;
                match cmd {
                    Command::Start => orchestrator.on_start(msg.chat.id).await,
                    Command::Help => orchestrator.on_help(msg.chat.id).await,
                    Command::ForgetCookies => orchestrator.on_forget_cookies(sender_of(&msg), msg.chat.id).await,
                };
                Ok(())
            }
        })
}

/// Handler for uploaded documents (cookies.txt)
fn document_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::filter_map(|msg: Message| document_of(&msg)).endpoint(
        move |msg: Message, document: DocumentUpload| {
            let deps = deps.clone();
            async move {
                log::info!(
                    "📎 Document {:?} ({} bytes) from chat {}",
                    document.file_name,
                    document.size,
                    msg.chat.id
                );
                deps.orchestrator
                    .on_document(sender_of(&msg), msg.chat.id, &document)
                    .await;
                Ok(())
            }
        },
    )
}

/// Handler for text messages (video links)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::filter(|msg: Message| is_plain_text(&msg)).endpoint(move |msg: Message| {
        let deps = deps.clone();
        async move {
            let text = msg.text().unwrap_or_default();
            log::info!("✉️ Text from chat {}: {}", msg.chat.id, text);
            deps.orchestrator.on_text(sender_of(&msg), msg.chat.id, text).await;
            Ok(())
        }
    })
}

/// Text that is not a command. Unknown commands are ignored.
fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|t| !t.trim_start().starts_with('/'))
}
