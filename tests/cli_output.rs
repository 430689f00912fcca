// One-shot command output must never carry terminal control sequences.

use chat_widget::app::{send_once, session_command};
use chat_widget::config::Config;
use chat_widget::session::SESSION_KEY;
use chat_widget::storage::{FileStore, SessionStore};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn live_config(api_url: &str, storage: &Path) -> Config {
    Config {
        api_url: api_url.to_string(),
        mock_mode: false,
        storage_dir: Some(storage.to_path_buf()),
        ..Config::default()
    }
}

async fn hostile_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok\u{1b}[2J\u{1b}]0;pwned\u{7}",
            "session_id": "s\u{1b}[31m1"
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn send_strips_escape_sequences_from_output() {
    let server = hostile_backend().await;
    let tmp = tempfile::tempdir().unwrap();
    let config = live_config(&server.uri(), tmp.path());

    let mut out = Vec::new();
    send_once(&config, "hi\u{1b}[1m", false, &mut out).await.unwrap();
    let printed = String::from_utf8(out).unwrap();

    assert!(!printed.contains('\u{1b}'), "raw ESC in output: {printed:?}");
    assert!(!printed.contains('\u{7}'));
    assert_eq!(printed, "you: hi[1m\nbot: ok[2J]0;pwned\nsession: s[31m1\n");
}

#[tokio::test]
async fn html_output_is_escaped_and_stripped() {
    let server = hostile_backend().await;
    let tmp = tempfile::tempdir().unwrap();
    let config = live_config(&server.uri(), tmp.path());

    let mut out = Vec::new();
    send_once(&config, "<b>hi</b>", true, &mut out).await.unwrap();
    let printed = String::from_utf8(out).unwrap();

    assert!(!printed.contains('\u{1b}'));
    assert!(printed.contains("&lt;b&gt;hi&lt;/b&gt;"));
    assert!(printed.contains("ok[2J]0;pwned"));
}

#[test]
fn session_command_strips_stored_escape_sequences() {
    let tmp = tempfile::tempdir().unwrap();
    FileStore::new(tmp.path())
        .set_item(SESSION_KEY, "abc\u{1b}]0;x\u{7}")
        .unwrap();
    let config = live_config("http://localhost:8000", tmp.path());

    let mut out = Vec::new();
    session_command(&config, false, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "abc]0;x\n");
}
