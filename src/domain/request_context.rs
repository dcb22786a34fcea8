//! Per-invocation request context
//!
//! Carries the headers that must accompany every outbound call made while
//! routing one event. A context is created when routing starts and dropped
//! when it ends; it is never shared between events.

use super::fields;
use super::event::{LooseRead, PatientEvent};
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Header carrying the event correlation id on outbound calls
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Inbound headers describing the inbound transport, never forwarded
const HOP_HEADERS: [&str; 4] = ["content-type", "content-length", "host", "transfer-encoding"];

/// Headers and identity for one routing invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    correlation_id: String,
    headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// Seed a context from the inbound message headers
    ///
    /// An inbound `X-Correlation-Id` (matched case-insensitively) is reused,
    /// otherwise a fresh one is generated. Headers that are not valid HTTP
    /// are dropped with a warning, as are transport headers such as
    /// `content-type` and `content-length`.
    pub fn from_inbound(inbound: &BTreeMap<String, String>) -> Self {
        let correlation_id = inbound
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CORRELATION_ID_HEADER))
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_empty() && is_valid_header(CORRELATION_ID_HEADER, value))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut headers: BTreeMap<String, String> = inbound
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CORRELATION_ID_HEADER))
            .filter(|(name, _)| !HOP_HEADERS.iter().any(|hop| name.eq_ignore_ascii_case(hop)))
            .filter(|(name, value)| {
                let valid = is_valid_header(name, value);
                if !valid {
                    tracing::warn!(header = %name, "Dropping inbound header that is not valid HTTP");
                }
                valid
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        headers.insert(CORRELATION_ID_HEADER.to_string(), correlation_id.clone());

        Self {
            correlation_id,
            headers,
        }
    }

    /// Copy the consent revocation flags of `event` into the headers
    ///
    /// A flag missing from the event removes any inbound header of the same
    /// name, so a stale value can never leak through.
    pub fn apply_consent_flags(&mut self, event: &PatientEvent) {
        for flag in [fields::REVOKE_CONSENT, fields::REVOKE_SENSITIVE_CONSENT] {
            match event.get_string(flag) {
                Some(value) if is_valid_header(flag, &value) => {
                    self.headers.insert(flag.to_string(), value);
                }
                Some(_) => {
                    tracing::warn!(header = flag, "Dropping consent flag that is not a valid header value");
                    self.headers.remove(flag);
                }
                None => {
                    self.headers.remove(flag);
                }
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

fn is_valid_header(name: &str, value: &str) -> bool {
    HeaderName::from_bytes(name.as_bytes()).is_ok() && HeaderValue::from_str(value).is_ok()
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::from_inbound(&BTreeMap::new())
    }
}
