//! Discord Channel for Courier
//!
//! This crate delivers notifications to Discord webhooks.
//!
//! A notification renders either a [`DiscordMessage`] or a Slack-style
//! [`courier_slack::SlackMessage`]. Discord messages are shaped into the
//! webhook's native JSON; Slack messages are formatted by the Slack
//! formatter and posted to the webhook's `/slack` compatibility endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use courier_discord::{DiscordMessage, DiscordWebhookChannel};
//!
//! let channel = DiscordWebhookChannel::new(transport);
//! let response = channel.send(&recipient, &notification).await?;
//! ```

mod channel;
mod formatter;
mod message;

pub use channel::{DiscordWebhookChannel, ToDiscord};
pub use formatter::{DiscordFormatter, WebhookRequest, SLACK_SUFFIX};
pub use message::{DiscordContent, DiscordEmbed, DiscordMessage, EmbedField, EmbedFieldEntry};
