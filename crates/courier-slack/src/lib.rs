//! Slack Channel for Courier
//!
//! Formats Slack-style messages into incoming-webhook payloads and
//! posts them through an injected [`courier::HttpTransport`].
//!
//! The formatter is also reused by the Discord channel, whose webhooks
//! accept Slack-compatible payloads on the `/slack` endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use courier_slack::{SlackMessage, SlackWebhookChannel};
//!
//! let channel = SlackWebhookChannel::new(transport);
//! let response = channel.send(&recipient, &notification).await?;
//! ```

mod channel;
mod message;

pub use channel::{SlackFormatter, SlackWebhookChannel, ToSlack};
pub use message::{
    SlackAttachment, SlackAttachmentField, SlackAttachmentFieldEntry, SlackLevel, SlackMessage,
};
