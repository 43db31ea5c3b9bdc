//! Discord message model
//!
//! Data shape of a Discord webhook message plus fluent builders.

use chrono::{DateTime, Utc};
use courier::HttpOptions;
use courier_slack::SlackMessage;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// What a notification renders for the Discord channel
#[derive(Debug, Clone, PartialEq)]
pub enum DiscordContent {
    /// Native Discord webhook message
    Discord(DiscordMessage),
    /// Slack-style message, posted to the webhook's `/slack` endpoint
    Slack(SlackMessage),
}

impl From<DiscordMessage> for DiscordContent {
    fn from(message: DiscordMessage) -> Self {
        Self::Discord(message)
    }
}

impl From<SlackMessage> for DiscordContent {
    fn from(message: SlackMessage) -> Self {
        Self::Slack(message)
    }
}

/// A Discord webhook message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordMessage {
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<DiscordEmbed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Creates a forum thread with this name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,
    /// Extra transport options merged beside the JSON body
    #[serde(default)]
    pub http: HttpOptions,
}

impl DiscordMessage {
    /// Create a message with the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append an embed configured by `build`
    pub fn embed(mut self, build: impl FnOnce(DiscordEmbed) -> DiscordEmbed) -> Self {
        self.embeds.push(build(DiscordEmbed::default()));
        self
    }

    /// Override the webhook's default username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Override the webhook's default avatar
    pub fn avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Read the message aloud
    pub fn tts(mut self, tts: bool) -> Self {
        self.tts = Some(tts);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Set extra transport options (headers, timeout, ...)
    pub fn http(mut self, options: HttpOptions) -> Self {
        self.http = options;
        self
    }
}

/// A rich-content block within a Discord message
///
/// `thumbnail`, `image`, `footer` and `author` are passed through to the
/// webhook as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
    #[serde(deserialize_with = "deserialize_fields")]
    pub fields: Vec<EmbedFieldEntry>,
}

impl DiscordEmbed {
    /// Sidebar color as a 0xRRGGBB integer
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Link applied to the title
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.thumbnail = Some(json!({ "url": url }));
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.image = Some(json!({ "url": url }));
        self
    }

    pub fn footer(mut self, text: impl Into<String>, icon_url: Option<&str>) -> Self {
        let mut footer = Map::new();
        footer.insert("text".into(), Value::String(text.into()));
        if let Some(icon_url) = icon_url {
            footer.insert("icon_url".into(), Value::from(icon_url));
        }
        self.footer = Some(Value::Object(footer));
        self
    }

    pub fn author(
        mut self,
        name: impl Into<String>,
        url: Option<&str>,
        icon_url: Option<&str>,
    ) -> Self {
        let mut author = Map::new();
        author.insert("name".into(), Value::String(name.into()));
        if let Some(url) = url {
            author.insert("url".into(), Value::from(url));
        }
        if let Some(icon_url) = icon_url {
            author.insert("icon_url".into(), Value::from(icon_url));
        }
        self.author = Some(Value::Object(author));
        self
    }

    /// Append a structured field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedFieldEntry::Field(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        }));
        self
    }

    /// Append raw name/value pairs in iteration order; each renders inline
    pub fn fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.extend(
            fields
                .into_iter()
                .map(|(k, v)| EmbedFieldEntry::Pair(k.into(), v.into())),
        );
        self
    }
}

/// One name/value row within an embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default = "default_inline")]
    pub inline: bool,
}

fn default_inline() -> bool {
    true
}

impl EmbedField {
    /// Create an inline field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Webhook representation of the field
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "value": self.value,
            "inline": self.inline,
        })
    }
}

/// One entry of [`DiscordEmbed::fields`]
///
/// In JSON a structured field is an object and a raw pair is a
/// two-element array `["Name", "value"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedFieldEntry {
    // Tried first: a two-element array would otherwise match the struct.
    Pair(String, String),
    Field(EmbedField),
}

impl From<EmbedField> for EmbedFieldEntry {
    fn from(field: EmbedField) -> Self {
        Self::Field(field)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbedFieldsRepr {
    List(Vec<EmbedFieldEntry>),
    Named(Map<String, Value>),
}

/// Accept `fields` as a list of entries or as a `{"Name": "value"}` object
///
/// Object keys become raw pairs in document order. Non-string values are
/// rendered as their JSON text.
fn deserialize_fields<'de, D>(deserializer: D) -> Result<Vec<EmbedFieldEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = match EmbedFieldsRepr::deserialize(deserializer)? {
        EmbedFieldsRepr::List(entries) => entries,
        EmbedFieldsRepr::Named(pairs) => pairs
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                EmbedFieldEntry::Pair(name, value)
            })
            .collect(),
    };
    Ok(fields)
}
