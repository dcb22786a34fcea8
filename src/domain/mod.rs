//! Domain models and types for the router.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Inbound events** ([`PatientEvent`]) with loose, coercing field reads ([`LooseRead`])
//! - **Organizations** ([`Organization`]) forming an ownership tree
//! - **Outbound request pieces** ([`QueryUrlBuilder`], [`EndpointKey`], [`DispatchKind`])
//! - **Per-event context** ([`RequestContext`]) carrying outbound headers
//! - **Error types** ([`RouterError`], [`DownstreamError`]) and the [`Result`] alias
//!
//! # Loose Reads
//!
//! Producers are not consistent about value types, so typed access always
//! coerces:
//!
//! ```rust
//! use patient_router::domain::{LooseRead, PatientEvent};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event = PatientEvent::from_json(r#"{"organizationId": "17", "staffId": 5}"#)?;
//! assert_eq!(event.organization_id(), Some(17));
//! assert_eq!(event.get_string("staffId").as_deref(), Some("5"));
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod errors;
pub mod event;
pub mod fields;
pub mod organization;
pub mod request;
pub mod request_context;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DownstreamError, RouterError};
pub use event::{LooseRead, PatientEvent, RequestParams, SubPayload};
pub use organization::Organization;
pub use request::{DispatchKind, EndpointKey, QueryUrlBuilder, RouteOutcome};
pub use request_context::RequestContext;
pub use result::Result;
