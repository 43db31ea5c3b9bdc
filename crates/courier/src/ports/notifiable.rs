//! Notifiable Port
//!
//! A recipient that can resolve the webhook URL for a given channel.

use std::collections::HashMap;

/// Route name used by the Discord webhook channel
pub const DISCORD_ROUTE: &str = "discord";

/// Route name used by the Slack webhook channel
pub const SLACK_ROUTE: &str = "slack";

/// The entity being notified
///
/// Channels ask the recipient for its address on their route. Returning
/// `None` means the recipient does not want notifications on that channel
/// and the channel skips delivery without error.
///
/// # Example
///
/// ```rust,ignore
/// struct Team { discord_webhook: Option<String> }
///
/// impl Notifiable for Team {
///     fn route_notification_for(&self, channel: &str) -> Option<String> {
///         match channel {
///             DISCORD_ROUTE => self.discord_webhook.clone(),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Notifiable: Send + Sync {
    /// Resolve the delivery URL for `channel` (e.g., "discord", "slack")
    fn route_notification_for(&self, channel: &str) -> Option<String>;

    /// Resolve the delivery URL for `channel` while delivering the
    /// notification identified by `notification`
    ///
    /// Channels call this one. Override it to route some notifications to a
    /// different webhook; the default ignores the notification.
    fn route_for_notification(&self, channel: &str, notification: &str) -> Option<String> {
        let _ = notification;
        self.route_notification_for(channel)
    }
}

/// A recipient defined only by its routes
///
/// Useful for on-demand notifications where no application entity exists,
/// e.g. a webhook URL taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct AnonymousNotifiable {
    routes: HashMap<String, String>,
}

impl AnonymousNotifiable {
    /// Create a recipient with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route for `channel`
    pub fn route(mut self, channel: impl Into<String>, url: impl Into<String>) -> Self {
        self.routes.insert(channel.into(), url.into());
        self
    }
}

impl Notifiable for AnonymousNotifiable {
    fn route_notification_for(&self, channel: &str) -> Option<String> {
        self.routes.get(channel).cloned()
    }
}
