//! Transport configuration

use std::time::Duration;
use tracing::warn;

const TIMEOUT_VAR: &str = "COURIER_HTTP_TIMEOUT_SECS";
const USER_AGENT_VAR: &str = "COURIER_USER_AGENT";

/// Configuration for [`crate::ReqwestTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpTransportConfig {
    /// Default timeout for a whole request
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("Courier-Webhook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpTransportConfig {
    /// Load from the environment (and `.env`, if present)
    ///
    /// Reads `COURIER_HTTP_TIMEOUT_SECS` and `COURIER_USER_AGENT`; unset or
    /// invalid values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_VAR),
            }
        }

        if let Some(user_agent) = lookup(USER_AGENT_VAR).filter(|ua| !ua.trim().is_empty()) {
            config.user_agent = user_agent;
        }

        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
