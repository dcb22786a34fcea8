//! Domain error types
//!
//! This module defines the error hierarchy for the router. All errors are
//! domain-specific and don't expose third-party types.

use super::request::EndpointKey;
use thiserror::Error;

/// Main router error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Business-rule validation errors (an event missing its identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Downstream or lookup call errors
    #[error("Downstream error: {0}")]
    Downstream(#[from] DownstreamError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised by the outbound call layer
///
/// Every variant carries the logical endpoint key so failures can be traced
/// back to the facade operation that produced them.
#[derive(Debug, Error)]
pub enum DownstreamError {
    /// Failed to reach the endpoint
    #[error("[{endpoint}] connection failed: {message}")]
    ConnectionFailed {
        endpoint: EndpointKey,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("[{endpoint}] request timeout: {message}")]
    Timeout {
        endpoint: EndpointKey,
        message: String,
    },

    /// Server error (5xx)
    #[error("[{endpoint}] server error: {status} - {message}")]
    ServerError {
        endpoint: EndpointKey,
        status: u16,
        message: String,
    },

    /// Client error (4xx)
    #[error("[{endpoint}] client error: {status} - {message}")]
    ClientError {
        endpoint: EndpointKey,
        status: u16,
        message: String,
    },

    /// Response body could not be interpreted
    #[error("[{endpoint}] invalid response: {message}")]
    InvalidResponse {
        endpoint: EndpointKey,
        message: String,
    },

    /// Request could not be built (bad URL or header); never sent
    #[error("[{endpoint}] invalid request: {message}")]
    InvalidRequest {
        endpoint: EndpointKey,
        message: String,
    },
}

impl DownstreamError {
    /// The endpoint key this failure belongs to
    pub fn endpoint(&self) -> EndpointKey {
        match self {
            DownstreamError::ConnectionFailed { endpoint, .. }
            | DownstreamError::Timeout { endpoint, .. }
            | DownstreamError::ServerError { endpoint, .. }
            | DownstreamError::ClientError { endpoint, .. }
            | DownstreamError::InvalidResponse { endpoint, .. }
            | DownstreamError::InvalidRequest { endpoint, .. } => *endpoint,
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DownstreamError::ConnectionFailed { .. }
                | DownstreamError::Timeout { .. }
                | DownstreamError::ServerError { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        RouterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        RouterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RouterError {
    fn from(err: toml::de::Error) -> Self {
        RouterError::Configuration(format!("TOML parse error: {err}"))
    }
}
