//! Chat-completion run mode with a canned language model
//!
//! Run with: cargo test --test chat_relay_test

mod mocks;

use mocks::{MockInference, MockTransport};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};

use vidgrab::chat::{ChatRelay, LlmError, LlmErrorKind};
use vidgrab::download::RequestOutcome;
use vidgrab::telegram::messages;

const USER: UserId = UserId(5);
const CHAT: ChatId = ChatId(5);

fn relay(client: MockInference) -> (ChatRelay, Arc<MockTransport>, Arc<MockInference>) {
    let transport = Arc::new(MockTransport::new());
    let client = Arc::new(client);
    (ChatRelay::new(transport.clone(), client.clone()), transport, client)
}

fn assert_thinking_lifecycle(transport: &MockTransport) {
    let notices = transport.ids_of(messages::THINKING);
    assert_eq!(notices.len(), 1);
    assert_eq!(transport.deleted(), notices);
}

#[tokio::test]
async fn test_answer_is_relayed() {
    let (relay, transport, client) = relay(MockInference::answering("Paris."));

    let outcome = relay.on_text(USER, CHAT, "Capital of France?").await;

    assert_eq!(outcome, RequestOutcome::Replied);
    assert_eq!(client.prompts(), vec!["Capital of France?".to_string()]);
    assert_eq!(transport.count_text("Paris."), 1);
    assert_thinking_lifecycle(&transport);
}

#[tokio::test]
async fn test_long_answer_is_split() {
    let answer = format!("{}\n{}", "a".repeat(4000), "b".repeat(4000));
    let (relay, transport, _) = relay(MockInference::answering(&answer));

    relay.on_text(USER, CHAT, "long please").await;

    let replies: Vec<String> = transport
        .texts()
        .into_iter()
        .filter(|t| t != messages::THINKING)
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies.iter().all(|r| r.chars().count() <= 4096));
    assert_eq!(replies.concat(), answer);
}

#[tokio::test]
async fn test_failure_is_classified() {
    let (relay, transport, _) = relay(MockInference::failing(|| LlmError::NetworkError("refused".into())));

    relay.on_text(USER, CHAT, "hi").await;

    assert_eq!(transport.count_text(&messages::llm_failed(LlmErrorKind::Network)), 1);
    assert_thinking_lifecycle(&transport);
}

#[tokio::test]
async fn test_start_greeting() {
    let (relay, transport, client) = relay(MockInference::answering("unused"));

    relay.on_start(CHAT).await;

    assert_eq!(transport.texts(), vec![messages::CHAT_START.to_string()]);
    assert!(client.prompts().is_empty());
}
