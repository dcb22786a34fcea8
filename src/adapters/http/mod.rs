//! HTTP facade implementations
//!
//! - [`HttpClient`] - shared transport with timeouts, bearer auth and retry
//! - [`HttpCihGateway`] - consumer lookups and integration dispatch
//! - [`HttpConfigurationLookup`] - configuration values and organization genealogy

pub mod client;
pub mod configuration;
pub mod gateway;

pub use client::HttpClient;
pub use configuration::HttpConfigurationLookup;
pub use gateway::HttpCihGateway;
