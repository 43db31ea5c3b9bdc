//! Transport Errors

use thiserror::Error;

/// Errors returned by [`crate::ReqwestTransport`]
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid transport option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    pub(crate) fn invalid_option<T: AsRef<str>>(name: T, reason: &str) -> Self {
        Self::InvalidOption {
            name: name.as_ref().to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status code, when the webhook answered with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
