//! Inbound patient events and loose field access
//!
//! Producers send events as flat JSON objects whose values may be strings,
//! numbers, booleans or JSON text embedded in a string. Nothing about the
//! value types is guaranteed, so every read goes through [`LooseRead`], which
//! coerces the stored value into the shape the caller asks for.

use super::fields;
use super::{Result, RouterError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of an outbound request: an ordered JSON object
pub type RequestParams = Map<String, Value>;

/// Decoded embedded sub-payload, `None` when absent or malformed
pub type SubPayload = Option<Map<String, Value>>;

/// Coerce a JSON value to its string form
///
/// Strings are returned as-is, numbers and booleans in display form, nested
/// arrays and objects as compact JSON. `null` reads as absent.
pub fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Coerce a JSON value to an `i64`
///
/// Accepts integral numbers (including floats such as `3.0`) and strings
/// that parse as an integer.
pub fn loose_long(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_float)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integral_float(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then(|| f as i64)
}

/// Typed reads over a loosely-typed mapping
pub trait LooseRead {
    /// Raw value stored under `key`
    fn value(&self, key: &str) -> Option<&Value>;

    fn get_string(&self, key: &str) -> Option<String> {
        self.value(key).and_then(loose_string)
    }

    fn get_long(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(loose_long)
    }

    fn get_integer(&self, key: &str) -> Option<i32> {
        self.get_long(key).and_then(|n| i32::try_from(n).ok())
    }

    /// String read that treats an empty string as absent
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_string(key).filter(|s| !s.is_empty())
    }
}

impl LooseRead for Map<String, Value> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: LooseRead> LooseRead for Option<T> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.as_ref().and_then(|inner| inner.value(key))
    }
}

/// One queued notification about a patient record
///
/// # Examples
///
/// ```
/// use patient_router::domain::event::{LooseRead, PatientEvent};
///
/// let event = PatientEvent::from_json(r#"{"patientId": 42, "type": "ADT"}"#).unwrap();
/// assert_eq!(event.patient_id().as_deref(), Some("42"));
/// assert_eq!(event.event_type().as_deref(), Some("ADT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientEvent(Map<String, Value>);

impl PatientEvent {
    /// Creates an event from an already decoded attribute map
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Parses an event from JSON text; the top level must be an object
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }

    /// Attribute map backing this event
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn patient_id(&self) -> Option<String> {
        self.get_string(fields::PATIENT_ID)
    }

    pub fn document_id(&self) -> Option<i64> {
        self.get_long(fields::DOCUMENT_ID)
    }

    /// The `type` discriminator
    pub fn event_type(&self) -> Option<String> {
        self.get_string(fields::TYPE)
    }

    /// The `event` discriminator
    pub fn event_name(&self) -> Option<String> {
        self.get_string(fields::EVENT)
    }

    /// Numeric organization id, when present and parseable
    pub fn organization_id(&self) -> Option<i64> {
        self.get_long(fields::ORGANIZATION_ID)
    }
}

impl LooseRead for PatientEvent {
    fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl TryFrom<Value> for PatientEvent {
    type Error = RouterError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RouterError::Serialization(format!(
                "Event must be a JSON object, got: {other}"
            ))),
        }
    }
}

impl From<Map<String, Value>> for PatientEvent {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> PatientEvent {
        PatientEvent::try_from(value).unwrap()
    }

    #[test]
    fn test_loose_string_coercions() {
        assert_eq!(loose_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(loose_string(&json!(12)), Some("12".to_string()));
        assert_eq!(loose_string(&json!(true)), Some("true".to_string()));
        assert_eq!(loose_string(&json!(null)), None);
        assert_eq!(loose_string(&json!(["a"])), Some("[\"a\"]".to_string()));
    }

    #[test]
    fn test_loose_long_coercions() {
        assert_eq!(loose_long(&json!(7)), Some(7));
        assert_eq!(loose_long(&json!(" 15 ")), Some(15));
        assert_eq!(loose_long(&json!("abc")), None);
        assert_eq!(loose_long(&json!(1.5)), None);
        assert_eq!(loose_long(&json!(3.0)), Some(3));
        assert_eq!(loose_long(&json!(-2.0)), Some(-2));
        assert_eq!(loose_long(&json!(1e20)), None);
        assert_eq!(loose_long(&json!(false)), None);
    }

    #[test]
    fn test_get_integer_out_of_range() {
        let e = event(json!({"big": 10_000_000_000i64, "small": "3"}));
        assert_eq!(e.get_integer("big"), None);
        assert_eq!(e.get_integer("small"), Some(3));
    }

    #[test]
    fn test_option_reads_are_absent_for_none() {
        let payload: SubPayload = None;
        assert_eq!(payload.get_string(fields::CLIENT_EPISODE_ID), None);
        assert_eq!(payload.get_long(fields::ACTIVITY_ID), None);
    }

    #[test]
    fn test_discriminators_and_identifiers() {
        let e = event(json!({
            "patientId": "P-1",
            "documentId": "900",
            "type": "CCDA",
            "event": "SIGN_CANS",
            "organizationId": "abc"
        }));
        assert_eq!(e.patient_id().as_deref(), Some("P-1"));
        assert_eq!(e.document_id(), Some(900));
        assert_eq!(e.event_type().as_deref(), Some("CCDA"));
        assert_eq!(e.event_name().as_deref(), Some("SIGN_CANS"));
        assert_eq!(e.organization_id(), None);
    }

    #[test]
    fn test_get_non_empty() {
        let e = event(json!({"appointmentId": "", "staffId": "s1"}));
        assert_eq!(e.get_non_empty(fields::APPOINTMENT_ID), None);
        assert_eq!(e.get_non_empty(fields::STAFF_ID).as_deref(), Some("s1"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = PatientEvent::from_json("[1, 2]");
        assert!(matches!(result, Err(RouterError::Serialization(_))));
    }
}
