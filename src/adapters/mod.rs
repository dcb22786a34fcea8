//! External system integrations for the router.
//!
//! This module provides the facades the router calls and their implementations:
//!
//! - [`traits`] - [`CihGateway`](traits::CihGateway) and
//!   [`ConfigurationLookup`](traits::ConfigurationLookup)
//! - [`http`] - reqwest-backed implementations
//! - [`memory`] - recording and fixed-table implementations for dry runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The router only holds
//! `Arc<dyn ...>` trait objects.
//!
//! # HTTP Adapters
//!
//! ```rust,no_run
//! use patient_router::adapters::http::{HttpCihGateway, HttpClient, HttpConfigurationLookup};
//! use patient_router::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("patient-router.toml")?;
//! let client = HttpClient::new(&config.http)?;
//!
//! let gateway = HttpCihGateway::new(client.clone());
//! let lookup = HttpConfigurationLookup::new(client, &config.endpoints)?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod memory;
pub mod traits;
