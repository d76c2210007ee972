//! cookies.txt upload and /forgetcookies handling
//!
//! Run with: cargo test --test cookies_upload_test

mod mocks;

use mocks::{MockSource, MockTransport, SourceBehavior};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use tempfile::TempDir;

use vidgrab::download::{CredentialStore, DownloadPipeline, DownloadPolicy, RejectReason, RequestOutcome};
use vidgrab::telegram::messages;
use vidgrab::telegram::{DocumentUpload, Orchestrator};

const USER: UserId = UserId(77);
const CHAT: ChatId = ChatId(77);

const COOKIES: &[u8] = b"# Netscape HTTP Cookie File\n.youtube.com\tTRUE\t/\tTRUE\t1999999999\tSID\tsecret\n";

struct Harness {
    orchestrator: Orchestrator,
    transport: Arc<MockTransport>,
    credentials: Arc<CredentialStore>,
    cookies_root: TempDir,
    _temp_root: TempDir,
}

async fn harness() -> Harness {
    let transport = Arc::new(MockTransport::new());
    let source = Arc::new(MockSource::new(SourceBehavior::produce("Sample", "abc.mp4", 1024)));
    let cookies_root = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let credentials = Arc::new(CredentialStore::open(cookies_root.path(), None).await.unwrap());
    let pipeline = DownloadPipeline::new(
        source,
        credentials.clone(),
        DownloadPolicy::default(),
        temp_root.path(),
        1,
    );

    Harness {
        orchestrator: Orchestrator::new(transport.clone(), pipeline, credentials.clone()),
        transport,
        credentials,
        cookies_root,
        _temp_root: temp_root,
    }
}

fn upload(h: &Harness, file_id: &str, name: &str, content: &[u8]) -> DocumentUpload {
    h.transport.add_document(file_id, content);
    DocumentUpload {
        file_id: file_id.to_string(),
        file_name: Some(name.to_string()),
        size: content.len() as u64,
    }
}

fn stored(h: &Harness) -> Option<Vec<u8>> {
    std::fs::read(h.cookies_root.path().join("77").join("cookies.txt")).ok()
}

#[tokio::test]
async fn test_cookies_upload_is_stored_byte_for_byte() {
    let h = harness().await;
    let doc = upload(&h, "file-1", "cookies.txt", COOKIES);

    let outcome = h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(outcome, RequestOutcome::Replied);
    assert_eq!(stored(&h).as_deref(), Some(COOKIES));
    assert_eq!(h.transport.texts(), vec![messages::COOKIES_SAVED.to_string()]);
    assert!(h.credentials.has_user_cookies(USER));
}

#[tokio::test]
async fn test_second_upload_replaces_first() {
    let h = harness().await;
    let first = upload(&h, "file-1", "cookies.txt", COOKIES);
    h.orchestrator.on_document(USER, CHAT, &first).await;

    let replacement = b"# Netscape HTTP Cookie File\n.vimeo.com\tTRUE\t/\tFALSE\t0\tvuid\tx\n";
    let second = upload(&h, "file-2", "cookies.txt", replacement);
    h.orchestrator.on_document(USER, CHAT, &second).await;

    assert_eq!(stored(&h).as_deref(), Some(&replacement[..]));
}

#[tokio::test]
async fn test_wrong_file_name_is_rejected_and_store_unchanged() {
    let h = harness().await;
    let original = upload(&h, "file-1", "cookies.txt", COOKIES);
    h.orchestrator.on_document(USER, CHAT, &original).await;

    for name in ["cookie.txt", "Cookies.txt", "cookies.txt.bak", "video.mp4"] {
        let doc = upload(&h, "file-x", name, b"garbage");
        let outcome = h.orchestrator.on_document(USER, CHAT, &doc).await;
        assert_eq!(outcome, RequestOutcome::Rejected(RejectReason::WrongFileName), "{}", name);
    }

    assert_eq!(stored(&h).as_deref(), Some(COOKIES));
    assert_eq!(h.transport.count_text(messages::COOKIES_WRONG_NAME), 4);
}

#[tokio::test]
async fn test_nameless_document_is_rejected() {
    let h = harness().await;
    h.transport.add_document("file-1", COOKIES);
    let doc = DocumentUpload {
        file_id: "file-1".to_string(),
        file_name: None,
        size: COOKIES.len() as u64,
    };

    let outcome = h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(outcome, RequestOutcome::Rejected(RejectReason::WrongFileName));
    assert!(stored(&h).is_none());
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let h = harness().await;
    let doc = upload(&h, "file-1", "cookies.txt", b"");

    let outcome = h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(outcome, RequestOutcome::Rejected(RejectReason::EmptyFile));
    assert!(stored(&h).is_none());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_before_download() {
    let h = harness().await;
    let doc = DocumentUpload {
        file_id: "not-registered".to_string(),
        file_name: Some("cookies.txt".to_string()),
        size: 5 * 1024 * 1024,
    };

    let outcome = h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(outcome, RequestOutcome::Rejected(RejectReason::FileTooLarge));
    assert!(stored(&h).is_none());
}

#[tokio::test]
async fn test_upload_without_header_is_saved_with_warning() {
    let h = harness().await;
    let content = b".youtube.com\tTRUE\t/\tTRUE\t0\tSID\tx\n";
    let doc = upload(&h, "file-1", "cookies.txt", content);

    h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(stored(&h).as_deref(), Some(&content[..]));
    assert_eq!(h.transport.texts(), vec![messages::COOKIES_SAVED_NO_HEADER.to_string()]);
}

#[tokio::test]
async fn test_upload_without_cookie_lines_is_saved_with_warning() {
    let h = harness().await;
    let content = b"# Netscape HTTP Cookie File\n# nothing exported\n";
    let doc = upload(&h, "file-1", "cookies.txt", content);

    h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert_eq!(stored(&h).as_deref(), Some(&content[..]));
    assert_eq!(h.transport.texts(), vec![messages::COOKIES_SAVED_NO_ENTRIES.to_string()]);
}

#[tokio::test]
async fn test_fetch_failure_leaves_store_untouched() {
    let h = harness().await;
    let doc = DocumentUpload {
        file_id: "missing".to_string(),
        file_name: Some("cookies.txt".to_string()),
        size: 10,
    };

    h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert!(stored(&h).is_none());
    assert_eq!(h.transport.texts(), vec![messages::COOKIES_SAVE_FAILED.to_string()]);
}

#[tokio::test]
async fn test_uploaded_cookies_are_used_for_downloads() {
    let h = harness().await;
    let doc = upload(&h, "file-1", "cookies.txt", COOKIES);
    h.orchestrator.on_document(USER, CHAT, &doc).await;

    let outcome = h.orchestrator.on_text(USER, CHAT, "https://youtu.be/abc").await;

    assert_eq!(outcome, RequestOutcome::Sent);
    assert_eq!(
        h.credentials.cookies_for(USER),
        Some(h.cookies_root.path().join("77").join("cookies.txt"))
    );
}

#[tokio::test]
async fn test_forget_cookies() {
    let h = harness().await;
    let doc = upload(&h, "file-1", "cookies.txt", COOKIES);
    h.orchestrator.on_document(USER, CHAT, &doc).await;

    h.orchestrator.on_forget_cookies(USER, CHAT).await;
    h.orchestrator.on_forget_cookies(USER, CHAT).await;

    assert!(stored(&h).is_none());
    assert!(!h.credentials.has_user_cookies(USER));
    assert_eq!(h.transport.count_text(messages::COOKIES_REMOVED), 1);
    assert_eq!(h.transport.count_text(messages::NO_COOKIES), 1);
}

#[tokio::test]
async fn test_users_do_not_share_cookies() {
    let h = harness().await;
    let doc = upload(&h, "file-1", "cookies.txt", COOKIES);
    h.orchestrator.on_document(USER, CHAT, &doc).await;

    assert!(h.credentials.cookies_for(UserId(78)).is_none());
}
