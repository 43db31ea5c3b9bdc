//! Payload assembly helpers
//!
//! Webhook payloads carry optional attributes that must be omitted when
//! unset and emitted verbatim when set, including zero, `false` and `""`.

use serde_json::{Map, Value};

/// A JSON object under construction
pub type PayloadObject = Map<String, Value>;

/// Insert `value` under `key` only if it is set
pub fn insert_if_set<V: Into<Value>>(object: &mut PayloadObject, key: &str, value: Option<V>) {
    if let Some(value) = value {
        object.insert(key.to_string(), value.into());
    }
}
