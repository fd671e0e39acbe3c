//! Security error types and error handling utilities.
//!
//! Errors raised while resolving configuration secrets, such as missing
//! environment variables or unreadable secret values. The `SecurityError`
//! type carries rich context and a trace ID for correlation in logs.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Result type alias for security operations
pub type SecurityResult<T> = Result<T, Box<SecurityError>>;

/// Represents errors that can occur during security operations.
///
/// This error type is used throughout the security module to provide consistent error handling
/// with rich context and tracing capabilities. Each variant includes an `ErrorContext` that
/// contains detailed information about the error, including a trace ID for distributed tracing.

#[derive(ThisError, Debug)]
pub enum SecurityError {
	/// Errors related to validation failures.
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// Errors related to parsing failures.
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// Errors related to network failures.
	#[error("Network error: {0}")]
	NetworkError(ErrorContext),

	/// Other errors that don't fit into the categories above.
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl SecurityError {
	// Validation error
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Parse error
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Network error
	pub fn network_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NetworkError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for SecurityError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::ParseError(ctx) => ctx.trace_id.clone(),
			Self::NetworkError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<std::io::Error> for SecurityError {
	fn from(err: std::io::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}

impl From<serde_json::Error> for SecurityError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}
