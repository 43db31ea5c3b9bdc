//! Slack message model
//!
//! Data shape of a Slack-style notification plus fluent builders.

use chrono::{DateTime, Utc};
use courier::HttpOptions;
use serde::{Deserialize, Serialize};

/// Severity of a Slack message, used as the default attachment color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlackLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl SlackLevel {
    /// Attachment color implied by the level
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("good"),
            Self::Warning => Some("warning"),
            Self::Error => Some("danger"),
        }
    }
}

/// A Slack-style message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    #[serde(default)]
    pub level: SlackLevel,
    /// Message text
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Emoji used as the bot icon (e.g. ":ghost:")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Image URL used as the bot icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Channel or user override (e.g. "#ops", "@alice")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    #[serde(default)]
    pub attachments: Vec<SlackAttachment>,
    /// Extra transport options merged beside the JSON body
    #[serde(default)]
    pub http: HttpOptions,
}

impl SlackMessage {
    /// Create an empty info-level message
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message text
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn info(mut self) -> Self {
        self.level = SlackLevel::Info;
        self
    }

    pub fn success(mut self) -> Self {
        self.level = SlackLevel::Success;
        self
    }

    pub fn warning(mut self) -> Self {
        self.level = SlackLevel::Warning;
        self
    }

    pub fn error(mut self) -> Self {
        self.level = SlackLevel::Error;
        self
    }

    /// Set the level explicitly
    pub fn level(mut self, level: SlackLevel) -> Self {
        self.level = level;
        self
    }

    /// Override the bot username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Use an emoji as the bot icon
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Use an image URL as the bot icon
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Send to a specific channel or user
    pub fn to(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Find and link channel names and usernames
    pub fn link_names(mut self) -> Self {
        self.link_names = Some(true);
        self
    }

    pub fn unfurl_links(mut self, unfurl: bool) -> Self {
        self.unfurl_links = Some(unfurl);
        self
    }

    pub fn unfurl_media(mut self, unfurl: bool) -> Self {
        self.unfurl_media = Some(unfurl);
        self
    }

    /// Append an attachment configured by `build`
    pub fn attachment(mut self, build: impl FnOnce(SlackAttachment) -> SlackAttachment) -> Self {
        self.attachments.push(build(SlackAttachment::default()));
        self
    }

    /// Set extra transport options (headers, timeout, ...)
    pub fn http(mut self, options: HttpOptions) -> Self {
        self.http = options;
        self
    }
}

/// A Slack message attachment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Link applied to the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub fields: Vec<SlackAttachmentFieldEntry>,
    /// Attachment properties rendered as markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SlackAttachment {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn pretext(mut self, pretext: impl Into<String>) -> Self {
        self.pretext = Some(pretext.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Override the level-derived color ("good", "#36a64f", ...)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Append a raw title/value field (rendered short)
    pub fn field(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.fields
            .push(SlackAttachmentFieldEntry::Pair(title.into(), content.into()));
        self
    }

    /// Append a structured field
    pub fn structured_field(mut self, field: SlackAttachmentField) -> Self {
        self.fields.push(SlackAttachmentFieldEntry::Field(field));
        self
    }

    /// Append raw title/value fields in iteration order
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.extend(
            fields
                .into_iter()
                .map(|(k, v)| SlackAttachmentFieldEntry::Pair(k.into(), v.into())),
        );
        self
    }

    pub fn markdown<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markdown = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn thumb(mut self, url: impl Into<String>) -> Self {
        self.thumb_url = Some(url.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn author_link(mut self, link: impl Into<String>) -> Self {
        self.author_link = Some(link.into());
        self
    }

    pub fn author_icon(mut self, icon: impl Into<String>) -> Self {
        self.author_icon = Some(icon.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn footer_icon(mut self, icon: impl Into<String>) -> Self {
        self.footer_icon = Some(icon.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A structured attachment field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachmentField {
    pub title: String,
    pub content: String,
    #[serde(default = "default_short")]
    pub short: bool,
}

fn default_short() -> bool {
    true
}

impl SlackAttachmentField {
    /// Create a short field
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            short: true,
        }
    }

    /// Render the field across the full attachment width
    pub fn long(mut self) -> Self {
        self.short = false;
        self
    }
}

/// One entry of [`SlackAttachment::fields`]
///
/// In JSON a structured field is an object and a raw pair is a
/// two-element array `["Title", "value"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlackAttachmentFieldEntry {
    // Tried first: a two-element array would otherwise match the struct.
    Pair(String, String),
    Field(SlackAttachmentField),
}
