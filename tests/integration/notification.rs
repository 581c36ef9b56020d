//! Integration tests for Telegram digest delivery

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use equiscan::services::notification::{deliver, NotificationError, NotificationSink, TelegramNotifier};

#[tokio::test]
async fn digest_is_posted_to_the_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .and(body_partial_json(json!({"chat_id": "42", "text": "3 signals found"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_base_url(server.uri(), "TOKEN", "42").unwrap();
    assert!(deliver(&notifier, "3 signals found").await.is_none());
}

#[tokio::test]
async fn rejected_delivery_is_reported_as_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_base_url(server.uri(), "TOKEN", "42").unwrap();
    match notifier.send("digest").await {
        Err(NotificationError::Rejected { status, description }) => {
            assert_eq!(status, 400);
            assert!(description.contains("chat not found"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    let warning = deliver(&notifier, "digest").await;
    assert!(warning.unwrap().contains("chat not found"));
}

#[tokio::test]
async fn unreachable_or_unconfigured_sink_never_fails_the_caller() {
    let unreachable = TelegramNotifier::with_base_url("http://127.0.0.1:1", "TOKEN", "42").unwrap();
    assert!(deliver(&unreachable, "digest").await.is_some());

    let unconfigured = TelegramNotifier::new("", "").unwrap();
    assert!(!unconfigured.is_configured());
    assert!(matches!(
        unconfigured.send("digest").await,
        Err(NotificationError::NotConfigured)
    ));
}
