//! Embedded JSON decoding
//!
//! Events carry auxiliary attributes as JSON text inside a string field. A
//! missing or malformed document is treated as "no data": it is logged and
//! decoded to `None`, never surfaced as an error.

use crate::domain::event::{LooseRead, SubPayload};
use serde_json::{Map, Value};

/// Decode a JSON object from optional text
///
/// # Examples
///
/// ```
/// use patient_router::core::codec::decode;
///
/// assert!(decode(None).is_none());
/// assert!(decode(Some("  ")).is_none());
/// assert!(decode(Some("not json")).is_none());
/// assert_eq!(decode(Some(r#"{"a":1}"#)).unwrap()["a"], 1);
/// ```
pub fn decode(json_text: Option<&str>) -> Option<Map<String, Value>> {
    let text = json_text.filter(|t| !t.trim().is_empty())?;

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::error!(
                kind = json_kind(&other),
                "Embedded JSON is not an object, ignoring it"
            );
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to decode embedded JSON, ignoring it");
            None
        }
    }
}

/// Decode the JSON text stored under `key` of `source`
pub fn decode_field<R: LooseRead + ?Sized>(source: &R, key: &str) -> SubPayload {
    decode(source.get_string(key).as_deref())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
