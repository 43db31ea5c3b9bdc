//! HTTP Transport for Courier
//!
//! Delivers webhook requests using reqwest.
//!
//! # Usage
//!
//! ```rust,ignore
//! use courier_discord::DiscordWebhookChannel;
//! use courier_http::{HttpTransportConfig, ReqwestTransport};
//!
//! let transport = ReqwestTransport::with_config(HttpTransportConfig::from_env())?;
//! let channel = DiscordWebhookChannel::new(transport);
//! ```

mod config;
mod error;
mod transport;

pub use config::HttpTransportConfig;
pub use error::TransportError;
pub use transport::{ReqwestTransport, WebhookResponse};
