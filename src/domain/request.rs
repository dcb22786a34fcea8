//! Outbound request building blocks
//!
//! URLs are composed by appending query parameters in a fixed order. A
//! parameter whose value is absent is still emitted, as a bare key, so every
//! URL of a given kind carries the same parameter list.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Logical name of an outbound call, used in logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointKey {
    ConsumerGetPatient,
    ConsumerGetContactInfo,
    CihSendPatient,
    CihSendCcda,
    CihSendContactInfo,
    CihSendMessage,
    ConfigurationGetValue,
    ConfigurationGetOrganization,
}

impl EndpointKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKey::ConsumerGetPatient => "consumer-get-patient",
            EndpointKey::ConsumerGetContactInfo => "consumer-get-contact-info",
            EndpointKey::CihSendPatient => "cih-send-patient",
            EndpointKey::CihSendCcda => "cih-send-ccda",
            EndpointKey::CihSendContactInfo => "cih-send-contact-info",
            EndpointKey::CihSendMessage => "cih-send-message",
            EndpointKey::ConfigurationGetValue => "configuration-get-value",
            EndpointKey::ConfigurationGetOrganization => "configuration-get-organization",
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query-string composer over a base URL
///
/// # Examples
///
/// ```
/// use patient_router::domain::request::QueryUrlBuilder;
/// use url::Url;
///
/// let base = Url::parse("http://consumer/patient").unwrap();
/// let url = QueryUrlBuilder::new(&base)
///     .param("patientId", Some("42"))
///     .param("staffId", None::<&str>)
///     .build();
/// assert_eq!(url, "http://consumer/patient?patientId=42&staffId");
/// ```
#[derive(Debug, Clone)]
pub struct QueryUrlBuilder {
    url: Url,
}

impl QueryUrlBuilder {
    pub fn new(base: &Url) -> Self {
        Self { url: base.clone() }
    }

    /// Append `name`, with its value when present or as a bare key when not
    pub fn param<V: fmt::Display>(mut self, name: &str, value: Option<V>) -> Self {
        {
            let mut pairs = self.url.query_pairs_mut();
            match value {
                Some(v) => {
                    pairs.append_pair(name, &v.to_string());
                }
                None => {
                    pairs.append_key_only(name);
                }
            }
        }
        self
    }

    pub fn build(self) -> String {
        self.url.to_string()
    }
}

/// The four outbound dispatch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// Appointment/ADT patient message
    Patient,
    /// Clinical document (CCDA) request
    Ccda,
    /// Referral contact information
    PersonContactInfo,
    /// Generic integration message
    Message,
}

impl DispatchKind {
    pub fn endpoint(&self) -> EndpointKey {
        match self {
            DispatchKind::Patient => EndpointKey::CihSendPatient,
            DispatchKind::Ccda => EndpointKey::CihSendCcda,
            DispatchKind::PersonContactInfo => EndpointKey::CihSendContactInfo,
            DispatchKind::Message => EndpointKey::CihSendMessage,
        }
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchKind::Patient => "patient",
            DispatchKind::Ccda => "ccda",
            DispatchKind::PersonContactInfo => "person_contact_info",
            DispatchKind::Message => "message",
        };
        f.write_str(name)
    }
}

/// Terminal state of routing one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// The event failed validation; nothing was called
    Rejected { reason: String },

    /// Dispatches completed, in branch order; may be empty
    Dispatched { dispatches: Vec<DispatchKind> },

    /// Routing was abandoned part way, e.g. a dispatch call failed
    Failed { error: String },
}

impl RouteOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, RouteOutcome::Dispatched { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RouteOutcome::Rejected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RouteOutcome::Failed { .. })
    }

    /// Dispatches made, empty for rejected or failed events
    pub fn dispatches(&self) -> &[DispatchKind] {
        match self {
            RouteOutcome::Dispatched { dispatches } => dispatches,
            _ => &[],
        }
    }
}
