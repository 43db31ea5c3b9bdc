//! reqwest implementation of the transport port

use async_trait::async_trait;
use courier::{HttpTransport, RequestOptions};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HttpTransportConfig;
use crate::error::TransportError;

/// Response of a delivered webhook request
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON (e.g. the message Discord returns for `?wait=true`)
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP implementation of [`HttpTransport`]
///
/// Understands these sibling options next to `json`:
/// - `headers`: object of header names to values
/// - `query`: object of query parameters
/// - `timeout`: per-request timeout in seconds (`0` keeps the client default)
/// - `http_errors`: when `true` (default), non-2xx responses are errors
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpTransportConfig::default())
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Use a preconfigured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Apply sibling options to `request`, returning whether HTTP error
    /// statuses should fail the call
    fn apply_options(
        &self,
        mut request: RequestBuilder,
        options: &RequestOptions,
    ) -> Result<(RequestBuilder, bool), TransportError> {
        let mut http_errors = true;

        for (name, value) in &options.options {
            match name.as_str() {
                "headers" => request = request.headers(header_map(value)?),
                "query" => request = request.query(&query_pairs(value)?),
                "timeout" => {
                    let secs = value
                        .as_f64()
                        .filter(|secs| secs.is_finite() && *secs >= 0.0)
                        .ok_or_else(|| {
                            TransportError::invalid_option(name, "expected a non-negative number")
                        })?;
                    if secs > 0.0 {
                        let timeout = Duration::try_from_secs_f64(secs)
                            .map_err(|_| TransportError::invalid_option(name, "out of range"))?;
                        request = request.timeout(timeout);
                    }
                }
                "http_errors" => {
                    http_errors = value
                        .as_bool()
                        .ok_or_else(|| TransportError::invalid_option(name, "expected a boolean"))?;
                }
                other => debug!(option = %other, "Ignoring unsupported transport option"),
            }
        }

        Ok((request, http_errors))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    type Response = WebhookResponse;
    type Error = TransportError;

    async fn post(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<WebhookResponse, TransportError> {
        let request = self.client.post(url).json(&options.json);
        let (request, http_errors) = self.apply_options(request, &options)?;

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(url = %url, status = %status.as_u16(), "Webhook responded");

        if http_errors && !status.is_success() {
            warn!(url = %url, status = %status.as_u16(), "Webhook rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(WebhookResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

fn header_map(value: &Value) -> Result<HeaderMap, TransportError> {
    let object = value
        .as_object()
        .ok_or_else(|| TransportError::invalid_option("headers", "expected an object"))?;

    let mut headers = HeaderMap::with_capacity(object.len());
    for (name, value) in object {
        let invalid = |reason: String| TransportError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let text = scalar_to_string(value)
            .ok_or_else(|| invalid("expected a string, number or boolean".to_string()))?;
        let header_value = HeaderValue::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

fn query_pairs(value: &Value) -> Result<Vec<(String, String)>, TransportError> {
    let object = value
        .as_object()
        .ok_or_else(|| TransportError::invalid_option("query", "expected an object"))?;

    object
        .iter()
        .map(|(key, value)| {
            scalar_to_string(value)
                .map(|text| (key.clone(), text))
                .ok_or_else(|| {
                    TransportError::invalid_option("query", "values must be scalars")
                })
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
