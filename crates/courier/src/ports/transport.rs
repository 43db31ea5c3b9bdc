//! HTTP Transport Port
//!
//! Abstract "POST JSON to URL" capability consumed by webhook channels.
//! Connection handling, TLS and timeouts belong to the implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Key carrying the JSON body inside [`RequestOptions`]
pub const JSON_KEY: &str = "json";

/// Additional transport-level request options (headers, timeout, query, ...)
pub type HttpOptions = Map<String, Value>;

/// Options handed to [`HttpTransport::post`]
///
/// `json` is the request body. Every other option rides alongside it at
/// the same level, mirroring the request-options object of the webhook
/// client this crate was modelled after.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// JSON body of the request
    pub json: Value,
    /// Sibling transport options
    pub options: HttpOptions,
}

impl RequestOptions {
    /// Create request options with only a JSON body
    pub fn new(json: impl Into<Value>) -> Self {
        Self {
            json: json.into(),
            options: HttpOptions::new(),
        }
    }

    /// Merge transport options next to the body
    ///
    /// Later options overwrite earlier ones. An option named `json` never
    /// replaces the body and is dropped.
    pub fn with_options(mut self, options: &HttpOptions) -> Self {
        for (key, value) in options {
            if key == JSON_KEY {
                warn!("Ignoring `json` entry in http options; the payload is authoritative");
                continue;
            }
            self.options.insert(key.clone(), value.clone());
        }
        self
    }

    /// Look up a sibling option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Flatten into a single JSON object (`json` first, then options)
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.options.len() + 1);
        object.insert(JSON_KEY.to_string(), self.json.clone());
        for (key, value) in &self.options {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// HTTP post capability
///
/// Channels return whatever the transport returns: the response on success
/// and the transport's own error otherwise. Nothing is wrapped or retried.
///
/// # Example
///
/// ```rust,ignore
/// use courier::ports::HttpTransport;
///
/// struct ReqwestTransport { /* reqwest client */ }
///
/// #[async_trait]
/// impl HttpTransport for ReqwestTransport {
///     type Response = WebhookResponse;
///     type Error = TransportError;
///
///     async fn post(&self, url: &str, options: RequestOptions)
///         -> Result<WebhookResponse, TransportError>
///     {
///         // Send HTTP POST with options.json as the body
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Response returned on success
    type Response: Send;
    /// Error returned on failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// POST `options.json` to `url`, applying the sibling options
    async fn post(&self, url: &str, options: RequestOptions)
        -> Result<Self::Response, Self::Error>;
}

#[async_trait]
impl<T> HttpTransport for Arc<T>
where
    T: HttpTransport + ?Sized,
{
    type Response = T::Response;
    type Error = T::Error;

    async fn post(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Self::Response, Self::Error> {
        (**self).post(url, options).await
    }
}
