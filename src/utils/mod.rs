//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Constants for the application
//! - logging: Logging utilities
//! - macros: Macros for common functionality
//! - metrics: Metrics utilities
//! - parsing: Parsing utilities
//! - tests: Test utilities
//! - http: HTTP client utilities (i.e. creation retryable HTTP clients)

pub mod client_storage;
pub mod constants;
pub mod http;
pub mod logging;
pub mod macros;
pub mod metrics;
pub mod parsing;
pub mod tests;

pub use constants::*;
pub use http::*;
pub use macros::*;
pub use parsing::*;
