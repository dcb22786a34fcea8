//! Core routing logic.
//!
//! # Modules
//!
//! - [`codec`] - Decoding of JSON embedded in event fields
//! - [`genealogy`] - Organization ancestor chains
//! - [`exclusions`] - Request date, extraction window and exclusion enrichment
//! - [`routing`] - Event validation, branch selection and dispatch
//!
//! # Routing Workflow
//!
//! For every event:
//!
//! 1. **Validate**: require `patientId` or `documentId`
//! 2. **Enrich**: configuration value, integration URL, consent headers
//! 3. **Branch**: ADT, CCDA, referral and generic integration, in that order
//! 4. **Dispatch**: one gateway call per matching branch
//!
//! # Example
//!
//! ```rust,no_run
//! use patient_router::adapters::memory::{RecordingGateway, StaticConfigurationLookup};
//! use patient_router::config::load_config;
//! use patient_router::core::routing::EventRouter;
//! use patient_router::domain::PatientEvent;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("patient-router.toml")?;
//! let router = EventRouter::from_config(
//!     &config.endpoints,
//!     Arc::new(RecordingGateway::new()),
//!     Arc::new(StaticConfigurationLookup::new()),
//! )?;
//!
//! let event = PatientEvent::from_json(r#"{"patientId": "42", "type": "ADT"}"#)?;
//! let outcome = router.on_message(&event, &BTreeMap::new()).await;
//! println!("Dispatches: {:?}", outcome.dispatches());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod exclusions;
pub mod genealogy;
pub mod routing;
