// Patient Router - patient event routing to the clinical integration hub
// Licensed under the MIT License

//! # Patient Router
//!
//! Routing and enrichment engine for queued patient events. Each event is
//! validated, enriched from the configuration and consumer services, and
//! dispatched to the clinical integration hub (CIH) endpoints its type and
//! event name select.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Validating** events, which need a `patientId` or a `documentId`
//! - **Enriching** requests with configuration values, organization genealogy,
//!   extraction windows and exclusions
//! - **Dispatching** ADT, CCDA, referral and generic integration messages
//! - **Isolating** consent headers per event under concurrent delivery
//!
//! ## Architecture
//!
//! The router follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Routing logic (codec, genealogy, exclusions, branches)
//! - [`adapters`] - Gateway and configuration facades with HTTP and in-memory implementations
//! - [`domain`] - Events, request building blocks and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patient_router::adapters::http::{HttpCihGateway, HttpClient, HttpConfigurationLookup};
//! use patient_router::config::load_config;
//! use patient_router::core::routing::EventRouter;
//! use patient_router::domain::PatientEvent;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("patient-router.toml")?;
//!
//!     let client = HttpClient::new(&config.http)?;
//!     let router = EventRouter::from_config(
//!         &config.endpoints,
//!         Arc::new(HttpCihGateway::new(client.clone())),
//!         Arc::new(HttpConfigurationLookup::new(client, &config.endpoints)?),
//!     )?;
//!
//!     let event = PatientEvent::from_json(r#"{"patientId": "42", "type": "ADT"}"#)?;
//!     let outcome = router.route(&event, &BTreeMap::new()).await?;
//!
//!     println!("Dispatches: {:?}", outcome.dispatches());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], backed by [`domain::RouterError`].
//! Downstream failures carry the endpoint key of the call that failed:
//!
//! ```rust
//! use patient_router::domain::{DownstreamError, EndpointKey, RouterError};
//!
//! let error: RouterError = DownstreamError::ServerError {
//!     endpoint: EndpointKey::CihSendPatient,
//!     status: 503,
//!     message: "unavailable".to_string(),
//! }
//! .into();
//! assert!(error.to_string().contains("cih-send-patient"));
//! ```
//!
//! ## Logging
//!
//! The router uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(event_type = "ADT", patient_id = "42", "Routing event");
//! warn!(endpoint = "configuration-get-value", "Enrichment lookup failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
