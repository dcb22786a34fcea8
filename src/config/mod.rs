//! Configuration management for the router.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The router uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PATIENT_ROUTER_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`EndpointsConfig`] - Downstream integration, consumer and configuration service URLs
//! - [`HttpConfig`] - Timeouts, TLS, bearer token and retry policy
//! - [`RoutingConfig`] - Event concurrency for the CLI
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [endpoints]
//! cih_integration_url = "https://cih.example.com/integration"
//! cih_referral_url = "https://cih.example.com/referral"
//! consumer_patient_url = "https://consumer.example.com/integration/patient"
//! consumer_patient_cans_url = "https://consumer.example.com/integration/patient/cans"
//! consumer_contact_info_url = "https://consumer.example.com/integration/patient/contact"
//! configuration_value_url = "https://config.example.com/configurations/value"
//! configuration_organization_url = "https://config.example.com/organizations/genealogy"
//!
//! [http]
//! timeout_seconds = 30
//! auth_token = "${PATIENT_ROUTER_TOKEN}"
//!
//! [http.retry]
//! max_retries = 3
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, EndpointsConfig, Environment, HttpConfig, LoggingConfig, RetryConfig,
    RouterConfig, RoutingConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
