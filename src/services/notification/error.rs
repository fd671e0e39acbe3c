//! Notification error types and handling.
//!
//! Provides error types for webhook notification operations, covering
//! network issues, configuration problems and delivery failures.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur during notification operations
#[derive(ThisError, Debug)]
pub enum NotificationError {
	/// Errors related to network connectivity issues
	#[error("Network error: {0}")]
	NetworkError(Box<ErrorContext>),

	/// Errors related to malformed requests or invalid responses
	#[error("Config error: {0}")]
	ConfigError(Box<ErrorContext>),

	/// Errors related to internal processing errors
	#[error("Internal error: {0}")]
	InternalError(Box<ErrorContext>),

	/// Errors related to notifier construction or client pooling
	#[error("Execution error: {0}")]
	ExecutionError(Box<ErrorContext>),

	/// Error when the Notifier `notify` method fails (e.g., webhook failure, parsing error, invalid signature)
	#[error("Notification failed: {0}")]
	NotifyFailed(Box<ErrorContext>),
}

impl NotificationError {
	// Network error
	pub fn network_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NetworkError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Config error
	pub fn config_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfigError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Execution error
	pub fn execution_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ExecutionError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Notify failed error
	pub fn notify_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotifyFailed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for NotificationError {
	fn trace_id(&self) -> String {
		match self {
			Self::NetworkError(ctx) => ctx.trace_id.clone(),
			Self::ConfigError(ctx) => ctx.trace_id.clone(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::ExecutionError(ctx) => ctx.trace_id.clone(),
			Self::NotifyFailed(ctx) => ctx.trace_id.clone(),
		}
	}
}
