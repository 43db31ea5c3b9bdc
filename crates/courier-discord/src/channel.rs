//! Discord webhook channel

use courier::{HttpTransport, Notifiable, DISCORD_ROUTE};
use tracing::debug;

use crate::formatter::DiscordFormatter;
use crate::message::DiscordContent;

/// Renders a notification for the Discord channel
///
/// Returning a Slack-style message routes it through the webhook's
/// Slack-compatible endpoint.
pub trait ToDiscord: Send + Sync {
    fn to_discord(&self, notifiable: &dyn Notifiable) -> DiscordContent;

    /// Identifier handed to [`Notifiable::route_for_notification`]
    fn notification_type(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Discord webhook channel
///
/// Holds only the injected transport; every `send` is independent.
pub struct DiscordWebhookChannel<H> {
    http: H,
    formatter: DiscordFormatter,
}

impl<H: HttpTransport> DiscordWebhookChannel<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            formatter: DiscordFormatter::new(),
        }
    }

    /// The payload formatter used by this channel
    pub fn formatter(&self) -> &DiscordFormatter {
        &self.formatter
    }

    /// Resolve the recipient's Discord webhook URL for `notification`
    ///
    /// `None` (or an empty URL) means "do not deliver".
    pub fn resolve_destination<N>(
        &self,
        notifiable: &dyn Notifiable,
        notification: &N,
    ) -> Option<String>
    where
        N: ToDiscord + ?Sized,
    {
        notifiable
            .route_for_notification(DISCORD_ROUTE, notification.notification_type())
            .filter(|url| !url.is_empty())
    }

    /// Send `notification` to the recipient's Discord webhook
    ///
    /// Returns `Ok(None)` without touching the transport when the recipient
    /// has no Discord route. Otherwise returns the transport's response or
    /// error unchanged.
    pub async fn send<N>(
        &self,
        notifiable: &dyn Notifiable,
        notification: &N,
    ) -> Result<Option<H::Response>, H::Error>
    where
        N: ToDiscord + ?Sized,
    {
        let Some(base_url) = self.resolve_destination(notifiable, notification) else {
            debug!("No Discord route for recipient, skipping delivery");
            return Ok(None);
        };

        let content = notification.to_discord(notifiable);
        let request = self.formatter.format(&base_url, &content);

        debug!(url = %request.url, "Posting Discord webhook");
        self.http.post(&request.url, request.options).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DiscordMessage;
    use async_trait::async_trait;
    use courier::{AnonymousNotifiable, RequestOptions, SLACK_ROUTE};
    use courier_slack::SlackMessage;
    use serde_json::json;
    use std::fmt;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    struct FakeResponse(u16);

    #[derive(Debug)]
    struct FakeError(&'static str);

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "transport failed: {}", self.0)
        }
    }

    impl std::error::Error for FakeError {}

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, RequestOptions)>>,
        fail: bool,
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        type Response = FakeResponse;
        type Error = FakeError;

        async fn post(
            &self,
            url: &str,
            options: RequestOptions,
        ) -> Result<FakeResponse, FakeError> {
            self.calls.lock().unwrap().push((url.to_string(), options));
            if self.fail {
                Err(FakeError("connection reset"))
            } else {
                Ok(FakeResponse(204))
            }
        }
    }

    struct BuildFailed;

    impl ToDiscord for BuildFailed {
        fn to_discord(&self, _notifiable: &dyn Notifiable) -> DiscordContent {
            DiscordMessage::new("Build failed")
                .embed(|e| e.title("Error").fields([("Stage", "test")]))
                .into()
        }
    }

    struct DeployFinished;

    impl ToDiscord for DeployFinished {
        fn to_discord(&self, _notifiable: &dyn Notifiable) -> DiscordContent {
            DiscordMessage::new("Deployed").into()
        }

        fn notification_type(&self) -> &str {
            "deploy_finished"
        }
    }

    /// Sends deploy notifications to a separate webhook
    struct OpsTeam;

    impl Notifiable for OpsTeam {
        fn route_notification_for(&self, channel: &str) -> Option<String> {
            (channel == DISCORD_ROUTE).then(|| "https://hooks/general".to_string())
        }

        fn route_for_notification(&self, channel: &str, notification: &str) -> Option<String> {
            match (channel, notification) {
                (DISCORD_ROUTE, "deploy_finished") => Some("https://hooks/deploys".to_string()),
                _ => self.route_notification_for(channel),
            }
        }
    }

    struct SlackStyle;

    impl ToDiscord for SlackStyle {
        fn to_discord(&self, _notifiable: &dyn Notifiable) -> DiscordContent {
            SlackMessage::new().content("legacy").into()
        }
    }

    struct Team {
        webhook: Option<String>,
    }

    impl Notifiable for Team {
        fn route_notification_for(&self, channel: &str) -> Option<String> {
            match channel {
                DISCORD_ROUTE => self.webhook.clone(),
                _ => None,
            }
        }
    }

    fn recipient(url: &str) -> AnonymousNotifiable {
        AnonymousNotifiable::new().route(DISCORD_ROUTE, url)
    }

    #[tokio::test]
    async fn test_send_posts_payload() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());

        let response = channel
            .send(&recipient("https://hooks/x"), &BuildFailed)
            .await
            .unwrap();

        assert_eq!(response, Some(FakeResponse(204)));
        let calls = channel.http.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://hooks/x");
        assert_eq!(
            calls[0].1.json,
            json!({
                "content": "Build failed",
                "embeds": [{"title": "Error", "fields": [{"name": "Stage", "value": "test", "inline": true}]}]
            })
        );
    }

    #[tokio::test]
    async fn test_send_without_route_skips_transport() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());
        let team = Team { webhook: None };

        let response = channel.send(&team, &BuildFailed).await.unwrap();

        assert_eq!(response, None);
        assert!(channel.http.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_route_is_absent() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());
        let team = Team {
            webhook: Some(String::new()),
        };

        assert_eq!(channel.resolve_destination(&team, &BuildFailed), None);
        assert_eq!(channel.send(&team, &BuildFailed).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_route_depends_on_notification() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());

        assert_eq!(
            channel.resolve_destination(&OpsTeam, &DeployFinished).as_deref(),
            Some("https://hooks/deploys")
        );

        channel.send(&OpsTeam, &DeployFinished).await.unwrap();
        channel.send(&OpsTeam, &BuildFailed).await.unwrap();

        let calls = channel.http.calls.lock().unwrap();
        assert_eq!(calls[0].0, "https://hooks/deploys");
        assert_eq!(calls[1].0, "https://hooks/general");
    }

    #[test]
    fn test_default_notification_type_is_type_name() {
        assert!(BuildFailed.notification_type().ends_with("BuildFailed"));
    }

    #[tokio::test]
    async fn test_other_routes_ignored() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());
        let only_slack = AnonymousNotifiable::new().route(SLACK_ROUTE, "https://hooks.slack/x");

        assert_eq!(channel.send(&only_slack, &BuildFailed).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slack_style_posts_to_suffix() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());

        channel
            .send(&recipient("https://hooks/x"), &SlackStyle)
            .await
            .unwrap();

        let calls = channel.http.calls.lock().unwrap();
        assert_eq!(calls[0].0, "https://hooks/x/slack");
        assert_eq!(calls[0].1.json, json!({"text": "legacy", "attachments": []}));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let channel = DiscordWebhookChannel::new(RecordingTransport {
            fail: true,
            ..Default::default()
        });

        let err = channel
            .send(&recipient("https://hooks/x"), &BuildFailed)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "transport failed: connection reset");
        assert_eq!(channel.http.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dyn_notification() {
        let channel = DiscordWebhookChannel::new(RecordingTransport::default());
        let notification: Box<dyn ToDiscord> = Box::new(BuildFailed);

        let response = channel
            .send(&recipient("https://hooks/x"), notification.as_ref())
            .await
            .unwrap();

        assert!(response.is_some());
    }
}
