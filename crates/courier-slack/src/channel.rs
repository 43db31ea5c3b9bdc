//! Slack webhook channel
//!
//! [`SlackFormatter`] shapes a [`SlackMessage`] into incoming-webhook
//! request options. [`SlackWebhookChannel`] resolves the recipient's URL and
//! posts the formatted payload.

use courier::{
    insert_if_set, HttpTransport, Notifiable, PayloadObject, RequestOptions, SLACK_ROUTE,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::message::{SlackAttachment, SlackAttachmentFieldEntry, SlackMessage};

/// Renders a notification as a Slack message
pub trait ToSlack: Send + Sync {
    fn to_slack(&self, notifiable: &dyn Notifiable) -> SlackMessage;

    /// Identifier handed to [`Notifiable::route_for_notification`]
    fn notification_type(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Builds Slack incoming-webhook payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct SlackFormatter;

impl SlackFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Build the request options for `message`
    ///
    /// `text` and `attachments` are always present; every other top-level
    /// key only when set on the message.
    pub fn build_json_payload(&self, message: &SlackMessage) -> RequestOptions {
        let mut payload = PayloadObject::new();
        payload.insert("text".into(), Value::from(message.content.as_str()));
        payload.insert("attachments".into(), self.attachments(message));

        insert_if_set(&mut payload, "channel", message.channel.as_deref());
        insert_if_set(&mut payload, "icon_emoji", message.icon.as_deref());
        insert_if_set(&mut payload, "icon_url", message.image.as_deref());
        insert_if_set(&mut payload, "link_names", message.link_names);
        insert_if_set(&mut payload, "unfurl_links", message.unfurl_links);
        insert_if_set(&mut payload, "unfurl_media", message.unfurl_media);
        insert_if_set(&mut payload, "username", message.username.as_deref());

        RequestOptions::new(Value::Object(payload)).with_options(&message.http)
    }

    fn attachments(&self, message: &SlackMessage) -> Value {
        message
            .attachments
            .iter()
            .map(|attachment| self.attachment(message, attachment))
            .collect::<Vec<_>>()
            .into()
    }

    fn attachment(&self, message: &SlackMessage, attachment: &SlackAttachment) -> Value {
        let color = attachment
            .color
            .as_deref()
            .or_else(|| message.level.color());

        let mut object = PayloadObject::new();
        insert_if_set(&mut object, "author_icon", attachment.author_icon.as_deref());
        insert_if_set(&mut object, "author_link", attachment.author_link.as_deref());
        insert_if_set(&mut object, "author_name", attachment.author_name.as_deref());
        insert_if_set(&mut object, "color", color);
        insert_if_set(&mut object, "fallback", attachment.fallback.as_deref());
        object.insert("fields".into(), self.fields(attachment));
        insert_if_set(&mut object, "footer", attachment.footer.as_deref());
        insert_if_set(&mut object, "footer_icon", attachment.footer_icon.as_deref());
        insert_if_set(&mut object, "image_url", attachment.image_url.as_deref());
        insert_if_set(&mut object, "mrkdwn_in", attachment.markdown.clone());
        insert_if_set(&mut object, "pretext", attachment.pretext.as_deref());
        insert_if_set(&mut object, "text", attachment.content.as_deref());
        insert_if_set(&mut object, "thumb_url", attachment.thumb_url.as_deref());
        insert_if_set(&mut object, "title", attachment.title.as_deref());
        insert_if_set(&mut object, "title_link", attachment.url.as_deref());
        insert_if_set(
            &mut object,
            "ts",
            attachment.timestamp.map(|ts| ts.timestamp()),
        );
        Value::Object(object)
    }

    fn fields(&self, attachment: &SlackAttachment) -> Value {
        attachment
            .fields
            .iter()
            .map(|entry| match entry {
                SlackAttachmentFieldEntry::Field(field) => json!({
                    "title": field.title,
                    "value": field.content,
                    "short": field.short,
                }),
                SlackAttachmentFieldEntry::Pair(title, value) => json!({
                    "title": title,
                    "value": value,
                    "short": true,
                }),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

/// Slack incoming-webhook channel
pub struct SlackWebhookChannel<H> {
    http: H,
    formatter: SlackFormatter,
}

impl<H: HttpTransport> SlackWebhookChannel<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            formatter: SlackFormatter,
        }
    }

    /// Send `notification` to the recipient's Slack webhook
    ///
    /// Returns `Ok(None)` without posting when the recipient has no Slack
    /// route. Transport errors are returned unchanged.
    pub async fn send<N>(
        &self,
        notifiable: &dyn Notifiable,
        notification: &N,
    ) -> Result<Option<H::Response>, H::Error>
    where
        N: ToSlack + ?Sized,
    {
        let Some(url) = notifiable
            .route_for_notification(SLACK_ROUTE, notification.notification_type())
            .filter(|url| !url.is_empty())
        else {
            debug!("No Slack route for recipient, skipping delivery");
            return Ok(None);
        };

        let message = notification.to_slack(notifiable);
        let options = self.formatter.build_json_payload(&message);

        debug!(url = %url, attachments = message.attachments.len(), "Posting Slack webhook");
        self.http.post(&url, options).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::SlackAttachmentField;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use courier::AnonymousNotifiable;
    use std::convert::Infallible;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, RequestOptions)>>,
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        type Response = u16;
        type Error = Infallible;

        async fn post(&self, url: &str, options: RequestOptions) -> Result<u16, Infallible> {
            self.calls.lock().unwrap().push((url.to_string(), options));
            Ok(200)
        }
    }

    struct Alert;

    impl ToSlack for Alert {
        fn to_slack(&self, _notifiable: &dyn Notifiable) -> SlackMessage {
            SlackMessage::new().success().content("Deployed")
        }
    }

    #[test]
    fn test_minimal_payload() {
        let options = SlackFormatter.build_json_payload(&SlackMessage::new().content("hi"));

        assert_eq!(options.json, json!({"text": "hi", "attachments": []}));
        assert!(options.options.is_empty());
    }

    #[test]
    fn test_optional_keys_renamed() {
        let message = SlackMessage::new()
            .content("hi")
            .username("bot")
            .icon(":ghost:")
            .image("https://img/bot.png")
            .to("#ops")
            .link_names()
            .unfurl_links(false);

        let json = SlackFormatter.build_json_payload(&message).json;

        assert_eq!(json["username"], "bot");
        assert_eq!(json["icon_emoji"], ":ghost:");
        assert_eq!(json["icon_url"], "https://img/bot.png");
        assert_eq!(json["channel"], "#ops");
        assert_eq!(json["link_names"], true);
        assert_eq!(json["unfurl_links"], false);
        assert!(json.get("unfurl_media").is_none());
    }

    #[test]
    fn test_attachment_mapping() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let message = SlackMessage::new().error().content("Build failed").attachment(|a| {
            a.title("Job #12")
                .url("https://ci/12")
                .content("Tests failed")
                .field("Stage", "test")
                .structured_field(SlackAttachmentField::new("Log", "trace...").long())
                .markdown(["text"])
                .timestamp(ts)
        });

        let json = SlackFormatter.build_json_payload(&message).json;

        assert_eq!(
            json["attachments"],
            json!([{
                "color": "danger",
                "fields": [
                    {"title": "Stage", "value": "test", "short": true},
                    {"title": "Log", "value": "trace...", "short": false}
                ],
                "mrkdwn_in": ["text"],
                "text": "Tests failed",
                "title": "Job #12",
                "title_link": "https://ci/12",
                "ts": ts.timestamp()
            }])
        );
    }

    #[test]
    fn test_attachment_color_overrides_level() {
        let message = SlackMessage::new()
            .warning()
            .attachment(|a| a.color("#36a64f"));

        let json = SlackFormatter.build_json_payload(&message).json;
        assert_eq!(json["attachments"][0]["color"], "#36a64f");
    }

    #[test]
    fn test_info_level_has_no_color() {
        let message = SlackMessage::new().attachment(|a| a.title("t"));

        let json = SlackFormatter.build_json_payload(&message).json;
        assert!(json["attachments"][0].get("color").is_none());
    }

    #[test]
    fn test_http_options_merged() {
        let mut http = courier::HttpOptions::new();
        http.insert("timeout".into(), json!(3));
        let message = SlackMessage::new().content("hi").http(http);

        let options = SlackFormatter.build_json_payload(&message);
        assert_eq!(options.option("timeout"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_send_posts_to_route() {
        let channel = SlackWebhookChannel::new(RecordingTransport::default());
        let recipient = AnonymousNotifiable::new().route(SLACK_ROUTE, "https://hooks.slack/x");

        let response = channel.send(&recipient, &Alert).await.unwrap();

        assert_eq!(response, Some(200));
        let calls = channel.http.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://hooks.slack/x");
        assert_eq!(calls[0].1.json["text"], "Deployed");
    }

    struct Escalations;

    impl Notifiable for Escalations {
        fn route_notification_for(&self, _channel: &str) -> Option<String> {
            None
        }

        fn route_for_notification(&self, channel: &str, notification: &str) -> Option<String> {
            (channel == SLACK_ROUTE && notification.ends_with("Alert"))
                .then(|| "https://hooks.slack/alerts".to_string())
        }
    }

    #[tokio::test]
    async fn test_send_routes_by_notification() {
        let channel = SlackWebhookChannel::new(RecordingTransport::default());

        let response = channel.send(&Escalations, &Alert).await.unwrap();

        assert_eq!(response, Some(200));
        assert_eq!(channel.http.calls.lock().unwrap()[0].0, "https://hooks.slack/alerts");
    }

    #[tokio::test]
    async fn test_send_without_route_skips() {
        let channel = SlackWebhookChannel::new(RecordingTransport::default());

        let response = channel.send(&AnonymousNotifiable::new(), &Alert).await.unwrap();

        assert_eq!(response, None);
        assert!(channel.http.calls.lock().unwrap().is_empty());
    }
}
