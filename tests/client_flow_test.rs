//! End-to-end client flows over HTTP
//!
//! Drives `ChatClient` through a real `HttpBackend` against `wiremock`,
//! observing the transcript through a recording renderer.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use memchat::view::RenderEvent;
use memchat::{HistoryStatus, LoginStatus, Message, SendStatus, ViewState};

use common::client_for;

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_alice_logs_in_and_history_loads_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get_conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"conversation": []})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, recorder) = client_for(&server.uri());
    let status = client.login("alice").await;

    assert_eq!(status, LoginStatus::LoggedIn(HistoryStatus::Replayed(0)));
    assert_eq!(client.session().view(), ViewState::Chat);
    assert_eq!(
        recorder.events().first(),
        Some(&RenderEvent::ShowChat("alice".to_string()))
    );
}

#[tokio::test]
async fn test_whitespace_username_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let (client, recorder) = client_for(&server.uri());
    assert_eq!(client.login("   ").await, LoginStatus::Ignored);
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_hello_gets_hi() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    assert_eq!(client.send_message("hello").await, SendStatus::Answered);
    assert_eq!(
        client.view().snapshot().messages(),
        &[Message::user("hello"), Message::bot("hi")]
    );
}

#[tokio::test]
async fn test_rate_limited_message_alerts_without_bot_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
        .mount(&server)
        .await;

    let (client, recorder) = client_for(&server.uri());
    assert_eq!(client.send_message("bad").await, SendStatus::Rejected);
    assert_eq!(recorder.alerts(), vec!["rate limited".to_string()]);
    assert_eq!(client.view().snapshot().messages(), &[Message::user("bad")]);
}

#[tokio::test]
async fn test_structured_error_object_still_alerts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"code": 429, "detail": "rate limited"}})),
        )
        .mount(&server)
        .await;

    let (client, recorder) = client_for(&server.uri());
    assert_eq!(client.send_message("bad").await, SendStatus::Rejected);

    let alerts = recorder.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("rate limited"));
    assert_eq!(client.view().snapshot().messages(), &[Message::user("bad")]);
}

#[tokio::test]
async fn test_history_replay_shows_exactly_server_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation": [
                {"sender": "user", "message": "a"},
                {"sender": "bot", "message": "b"}
            ]
        })))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    client.view().append(Message::user("left over"));

    assert_eq!(client.load_history().await, HistoryStatus::Replayed(2));
    assert_eq!(
        client.view().snapshot().messages(),
        &[Message::user("a"), Message::bot("b")]
    );
}

#[tokio::test]
async fn test_login_transport_failure_is_silent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let (client, recorder) = client_for(&server.uri());
    assert_eq!(client.login("alice").await, LoginStatus::TransportFailed);
    assert_eq!(client.session().view(), ViewState::Login);
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_user_message_visible_while_reply_is_pending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "eventually"}))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    let handle = client.spawn_send("are you there?").unwrap();

    assert_eq!(
        client.view().snapshot().messages(),
        &[Message::user("are you there?")]
    );

    assert_eq!(handle.await.unwrap(), SendStatus::Answered);
    assert_eq!(client.view().len(), 2);
}
