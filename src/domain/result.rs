//! Result type alias for the router
//!
//! This module provides a convenient Result type alias that uses
//! [`RouterError`] as the error type.

use super::errors::RouterError;

/// Result type alias for router operations
///
/// # Examples
///
/// ```
/// use patient_router::domain::result::Result;
/// use patient_router::domain::errors::RouterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RouterError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RouterError>;
