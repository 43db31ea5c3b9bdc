//! End-to-end tests for the Discord channel over reqwest using wiremock

use courier::{AnonymousNotifiable, HttpOptions, Notifiable, DISCORD_ROUTE};
use courier_discord::{DiscordContent, DiscordMessage, DiscordWebhookChannel, ToDiscord};
use courier_http::{ReqwestTransport, TransportError};
use courier_slack::SlackMessage;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Rendered(DiscordContent);

impl ToDiscord for Rendered {
    fn to_discord(&self, _notifiable: &dyn Notifiable) -> DiscordContent {
        self.0.clone()
    }
}

fn channel() -> DiscordWebhookChannel<ReqwestTransport> {
    DiscordWebhookChannel::new(ReqwestTransport::new().expect("client should build"))
}

/// A Discord message is posted verbatim to the webhook URL
#[tokio::test]
async fn test_discord_message_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(header("x-ci-run", "812"))
        .and(body_json(json!({
            "content": "Build failed",
            "embeds": [
                {"title": "Error", "color": 15158332, "fields": [{"name": "Stage", "value": "test", "inline": true}]}
            ],
            "username": "CI Bot"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut http = HttpOptions::new();
    http.insert("headers".into(), json!({"X-CI-Run": "812"}));
    let message = DiscordMessage::new("Build failed")
        .embed(|e| e.title("Error").color(15158332).fields([("Stage", "test")]))
        .username("CI Bot")
        .http(http);

    let recipient = AnonymousNotifiable::new().route(
        DISCORD_ROUTE,
        format!("{}/api/webhooks/1/token", server.uri()),
    );

    let response = channel()
        .send(&recipient, &Rendered(message.into()))
        .await
        .unwrap()
        .expect("delivery should happen");

    assert_eq!(response.status, 204);
}

/// Slack-style messages go to the `/slack` compatibility endpoint
#[tokio::test]
async fn test_slack_message_delivered_to_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token/slack"))
        .and(body_json(json!({
            "text": "Deployed",
            "attachments": [{"color": "good", "fields": [], "title": "v1.2.0"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let message = SlackMessage::new()
        .success()
        .content("Deployed")
        .attachment(|a| a.title("v1.2.0"));
    let recipient = AnonymousNotifiable::new().route(
        DISCORD_ROUTE,
        format!("{}/api/webhooks/1/token", server.uri()),
    );

    let response = channel()
        .send(&recipient, &Rendered(message.into()))
        .await
        .unwrap()
        .expect("delivery should happen");

    assert_eq!(response.body, "ok");
}

/// Webhook rejections surface as the transport's own error
#[tokio::test]
async fn test_rejection_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message": "Unknown Webhook"}"#))
        .mount(&server)
        .await;

    let recipient = AnonymousNotifiable::new().route(DISCORD_ROUTE, server.uri());

    let err = channel()
        .send(&recipient, &Rendered(DiscordMessage::new("hi").into()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 404, .. }));
}

/// No route, no request
#[tokio::test]
async fn test_missing_route_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let response = channel()
        .send(
            &AnonymousNotifiable::new(),
            &Rendered(DiscordMessage::new("hi").into()),
        )
        .await
        .unwrap();

    assert!(response.is_none());
}
