//! Discord webhook payload formatting

use courier::{insert_if_set, PayloadObject, RequestOptions};
use courier_slack::SlackFormatter;
use serde_json::{json, Value};
use tracing::debug;

use crate::message::{DiscordContent, DiscordEmbed, DiscordMessage, EmbedFieldEntry};

/// Path appended to the webhook URL for Slack-compatible payloads
pub const SLACK_SUFFIX: &str = "/slack";

/// A formatted request, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    /// Effective delivery URL
    pub url: String,
    /// Body and sibling transport options
    pub options: RequestOptions,
}

/// Shapes Discord and Slack-style messages into webhook requests
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordFormatter {
    slack: SlackFormatter,
}

impl DiscordFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the target URL and request options for `content`
    ///
    /// Slack-style messages are handed to the Slack formatter untouched and
    /// target `<base_url>/slack`. Discord messages target `base_url` as-is.
    pub fn format(&self, base_url: &str, content: &DiscordContent) -> WebhookRequest {
        match content {
            DiscordContent::Slack(message) => {
                debug!("Delegating Slack-style message to the Slack formatter");
                WebhookRequest {
                    url: slack_endpoint(base_url),
                    options: self.slack.build_json_payload(message),
                }
            }
            DiscordContent::Discord(message) => WebhookRequest {
                url: base_url.to_string(),
                options: self.build_json_payload(message),
            },
        }
    }

    /// Build the request options for a Discord message
    ///
    /// `content` and `embeds` are always present. `username`, `avatar_url`,
    /// `tts`, `timestamp` and `thread_name` appear only when set.
    pub fn build_json_payload(&self, message: &DiscordMessage) -> RequestOptions {
        let mut payload = PayloadObject::new();
        payload.insert("content".into(), Value::from(message.content.as_str()));
        payload.insert("embeds".into(), Value::Array(self.map_embeds(&message.embeds)));

        insert_if_set(&mut payload, "username", message.username.as_deref());
        insert_if_set(&mut payload, "avatar_url", message.avatar_url.as_deref());
        insert_if_set(&mut payload, "tts", message.tts);
        insert_if_set(
            &mut payload,
            "timestamp",
            message.timestamp.map(|ts| ts.to_rfc3339()),
        );
        insert_if_set(&mut payload, "thread_name", message.thread_name.as_deref());

        RequestOptions::new(Value::Object(payload)).with_options(&message.http)
    }

    /// Map embeds in order, keeping only the attributes that are set
    ///
    /// `fields` is always emitted, as `[]` for an embed without fields.
    pub fn map_embeds(&self, embeds: &[DiscordEmbed]) -> Vec<Value> {
        embeds
            .iter()
            .map(|embed| {
                let mut object = PayloadObject::new();
                insert_if_set(&mut object, "color", embed.color);
                insert_if_set(&mut object, "title", embed.title.as_deref());
                insert_if_set(&mut object, "description", embed.description.as_deref());
                insert_if_set(&mut object, "url", embed.url.as_deref());
                insert_if_set(&mut object, "thumbnail", embed.thumbnail.clone());
                insert_if_set(&mut object, "image", embed.image.clone());
                insert_if_set(&mut object, "footer", embed.footer.clone());
                insert_if_set(&mut object, "author", embed.author.clone());
                object.insert(
                    "fields".into(),
                    Value::Array(self.map_embed_fields(embed)),
                );
                Value::Object(object)
            })
            .collect()
    }

    /// Map an embed's fields in order
    ///
    /// Structured fields keep their own `inline`; raw pairs become inline
    /// fields named after their key.
    pub fn map_embed_fields(&self, embed: &DiscordEmbed) -> Vec<Value> {
        embed
            .fields
            .iter()
            .map(|entry| match entry {
                EmbedFieldEntry::Field(field) => field.to_value(),
                EmbedFieldEntry::Pair(name, value) => json!({
                    "name": name,
                    "value": value,
                    "inline": true,
                }),
            })
            .collect()
    }
}

// Query strings stay at the end so `?wait=true` style parameters survive.
fn slack_endpoint(base_url: &str) -> String {
    match base_url.split_once('?') {
        Some((path, query)) => format!("{}{}?{}", path, SLACK_SUFFIX, query),
        None => format!("{}{}", base_url, SLACK_SUFFIX),
    }
}
