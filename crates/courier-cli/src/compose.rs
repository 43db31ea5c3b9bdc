//! Building messages from command-line arguments

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use courier::HttpOptions;
use courier_discord::{DiscordEmbed, DiscordMessage};
use courier_slack::{SlackLevel, SlackMessage};
use serde_json::{Map, Value};
use std::fs;

/// Arguments describing a Discord message
#[derive(Args, Debug, Default)]
pub struct MessageArgs {
    /// Message content
    pub content: Option<String>,
    /// Load the message from a JSON file (flags below override it)
    #[arg(short, long)]
    pub file: Option<String>,
    /// Embed title (creates an embed)
    #[arg(long)]
    pub title: Option<String>,
    /// Embed description
    #[arg(long)]
    pub description: Option<String>,
    /// Embed color: "#e74c3c", "0xe74c3c" or decimal
    #[arg(long)]
    pub color: Option<String>,
    /// Embed title link
    #[arg(long)]
    pub link: Option<String>,
    /// Embed field NAME=VALUE (repeatable, rendered inline)
    #[arg(long = "field")]
    pub fields: Vec<String>,
    /// Embed field NAME=VALUE rendered on its own line (repeatable)
    #[arg(long = "block-field")]
    pub block_fields: Vec<String>,
    /// Override the webhook username
    #[arg(long)]
    pub username: Option<String>,
    /// Override the webhook avatar
    #[arg(long)]
    pub avatar_url: Option<String>,
    /// Read the message aloud
    #[arg(long)]
    pub tts: bool,
    /// Message timestamp (RFC 3339)
    #[arg(long)]
    pub timestamp: Option<String>,
    /// Create a forum thread with this name
    #[arg(long)]
    pub thread_name: Option<String>,
    /// Extra request header NAME:VALUE (repeatable)
    #[arg(long = "header")]
    pub headers: Vec<String>,
}

impl MessageArgs {
    /// Build the Discord message described by the arguments
    pub fn build(&self) -> Result<DiscordMessage> {
        let mut message = match &self.file {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read message file {:?}", path))?;
                serde_json::from_str::<DiscordMessage>(&text)
                    .with_context(|| format!("Invalid message JSON in {:?}", path))?
            }
            None => DiscordMessage::default(),
        };

        if let Some(content) = &self.content {
            message.content = content.clone();
        }
        if let Some(username) = &self.username {
            message = message.username(username);
        }
        if let Some(avatar_url) = &self.avatar_url {
            message = message.avatar_url(avatar_url);
        }
        if self.tts {
            message = message.tts(true);
        }
        if let Some(raw) = &self.timestamp {
            let timestamp: DateTime<Utc> = raw
                .parse()
                .with_context(|| format!("Invalid RFC 3339 timestamp '{}'", raw))?;
            message = message.timestamp(timestamp);
        }
        if let Some(thread_name) = &self.thread_name {
            message = message.thread_name(thread_name);
        }

        if let Some(embed) = self.embed()? {
            message.embeds.push(embed);
        }

        if !self.headers.is_empty() {
            merge_headers(&mut message.http, &self.headers)?;
        }

        if message.content.is_empty() && message.embeds.is_empty() {
            bail!("Nothing to send: provide content, --file or an embed (--title, --field, ...)");
        }

        Ok(message)
    }

    fn embed(&self) -> Result<Option<DiscordEmbed>> {
        let wants_embed = self.title.is_some()
            || self.description.is_some()
            || self.color.is_some()
            || self.link.is_some()
            || !self.fields.is_empty()
            || !self.block_fields.is_empty();
        if !wants_embed {
            return Ok(None);
        }

        let mut embed = DiscordEmbed::default();
        if let Some(title) = &self.title {
            embed = embed.title(title);
        }
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        if let Some(color) = &self.color {
            embed = embed.color(parse_color(color)?);
        }
        if let Some(link) = &self.link {
            embed = embed.url(link);
        }
        for raw in &self.fields {
            let (name, value) = split_pair(raw, '=')?;
            embed = embed.fields([(name, value)]);
        }
        for raw in &self.block_fields {
            let (name, value) = split_pair(raw, '=')?;
            embed = embed.field(name, value, false);
        }
        Ok(Some(embed))
    }
}

/// Arguments describing a Slack-style message
#[derive(Args, Debug, Default)]
pub struct SlackArgs {
    /// Message text
    pub content: String,
    /// Level: info, success, warning, error
    #[arg(short, long, default_value = "info")]
    pub level: String,
    /// Override the bot username
    #[arg(long)]
    pub username: Option<String>,
    /// Channel override (e.g. "#ops")
    #[arg(long)]
    pub channel: Option<String>,
    /// Emoji icon (e.g. ":rocket:")
    #[arg(long)]
    pub icon: Option<String>,
    /// Attachment title (creates an attachment)
    #[arg(long)]
    pub title: Option<String>,
    /// Attachment field TITLE=VALUE (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,
}

impl SlackArgs {
    pub fn build(&self) -> Result<SlackMessage> {
        let mut message = SlackMessage::new()
            .level(parse_level(&self.level)?)
            .content(&self.content);

        if let Some(username) = &self.username {
            message = message.username(username);
        }
        if let Some(channel) = &self.channel {
            message = message.to(channel);
        }
        if let Some(icon) = &self.icon {
            message = message.icon(icon);
        }

        if self.title.is_some() || !self.fields.is_empty() {
            let fields = self
                .fields
                .iter()
                .map(|raw| split_pair(raw, '='))
                .collect::<Result<Vec<_>>>()?;
            let title = self.title.clone();
            message = message.attachment(|mut attachment| {
                if let Some(title) = title {
                    attachment = attachment.title(title);
                }
                attachment.fields(fields)
            });
        }

        Ok(message)
    }
}

/// Parse "#rrggbb", "0xrrggbb" or a decimal integer
pub fn parse_color(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let parsed = if let Some(hex) = raw.strip_prefix('#').or_else(|| raw.strip_prefix("0x")) {
        u32::from_str_radix(hex, 16)
    } else {
        raw.parse::<u32>()
    };
    let color = parsed.with_context(|| format!("Invalid color '{}'", raw))?;
    if color > 0xFF_FF_FF {
        bail!("Color '{}' is out of range (max 0xFFFFFF)", raw);
    }
    Ok(color)
}

fn parse_level(raw: &str) -> Result<SlackLevel> {
    match raw.to_ascii_lowercase().as_str() {
        "info" => Ok(SlackLevel::Info),
        "success" => Ok(SlackLevel::Success),
        "warning" => Ok(SlackLevel::Warning),
        "error" => Ok(SlackLevel::Error),
        other => bail!("Unknown level '{}' (expected info, success, warning, error)", other),
    }
}

fn split_pair(raw: &str, separator: char) -> Result<(String, String)> {
    match raw.split_once(separator) {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("Expected NAME{}VALUE, got '{}'", separator, raw),
    }
}

fn merge_headers(http: &mut HttpOptions, raw_headers: &[String]) -> Result<()> {
    let mut headers = match http.remove("headers") {
        Some(Value::Object(existing)) => existing,
        Some(_) => bail!("`http.headers` in the message file must be an object"),
        None => Map::new(),
    };
    for raw in raw_headers {
        let (name, value) = split_pair(raw, ':')?;
        headers.insert(name, Value::String(value));
    }
    http.insert("headers".into(), Value::Object(headers));
    Ok(())
}
