//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use patient_router::logging::init_logging;
//! use patient_router::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Router started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a completed dispatch
///
/// # Example
///
/// ```no_run
/// use patient_router::log_dispatch;
/// use patient_router::domain::{DispatchKind, RequestContext};
///
/// let ctx = RequestContext::default();
/// log_dispatch!(DispatchKind::Patient, &ctx, "http://cih/integration?type=ADT");
/// ```
#[macro_export]
macro_rules! log_dispatch {
    ($kind:expr, $ctx:expr, $url:expr) => {
        tracing::info!(
            dispatch = %$kind,
            correlation_id = $ctx.correlation_id(),
            url = %$url,
            "Dispatched event"
        );
    };
}

/// Log an enrichment lookup that failed and was skipped
///
/// # Example
///
/// ```no_run
/// use patient_router::log_lookup_degraded;
/// use patient_router::domain::{DownstreamError, EndpointKey, RequestContext};
///
/// let ctx = RequestContext::default();
/// let error = DownstreamError::Timeout {
///     endpoint: EndpointKey::ConfigurationGetValue,
///     message: "30s".to_string(),
/// };
/// log_lookup_degraded!(&error, &ctx, "configurationValue omitted");
/// ```
#[macro_export]
macro_rules! log_lookup_degraded {
    ($error:expr, $ctx:expr, $consequence:expr) => {
        tracing::warn!(
            endpoint = %$error.endpoint(),
            error = %$error,
            correlation_id = $ctx.correlation_id(),
            consequence = $consequence,
            "Enrichment lookup failed, continuing without it"
        );
    };
}
