//! Courier Core Library
//!
//! Shared interfaces for webhook notification channels.
//!
//! # Architecture
//!
//! Channels (Discord, Slack) live in their own crates and depend only on
//! the ports defined here:
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `transport`: the "POST JSON to URL" capability and its request options
//!   - `notifiable`: recipients that resolve a per-channel webhook URL
//!
//! - **Payload** (`payload`): helpers for assembling JSON objects where
//!   optional attributes are emitted only when set
//!
//! # Usage
//!
//! ```rust,ignore
//! use courier::{HttpTransport, Notifiable, RequestOptions};
//! ```

pub mod payload;
pub mod ports;

// Re-export commonly used types
pub use payload::{insert_if_set, PayloadObject};
pub use ports::{
    AnonymousNotifiable, HttpOptions, HttpTransport, Notifiable, RequestOptions, DISCORD_ROUTE,
    SLACK_ROUTE,
};
