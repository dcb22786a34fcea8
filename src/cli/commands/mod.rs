//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod route;
pub mod validate;
