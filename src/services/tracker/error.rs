//! Submission tracker error types and handling.
//!
//! Covers the failure modes of recording and resolving pending submissions:
//! missing wallet sessions, rejected transactions and durable store faults.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur while tracking submissions
#[derive(ThisError, Debug)]
pub enum TrackerError {
	/// No wallet address is connected for an operation that requires one
	#[error("Not connected: {0}")]
	NotConnected(ErrorContext),

	/// The wallet or the chain declined the submission
	#[error("Transaction rejected: {0}")]
	TransactionRejected(ErrorContext),

	/// The durable store rejected or failed a request
	#[error("Store error: {0}")]
	StoreError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl TrackerError {
	// Not connected
	pub fn not_connected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotConnected(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Transaction rejected
	pub fn transaction_rejected(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransactionRejected(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Store error
	pub fn store_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StoreError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for TrackerError {
	fn trace_id(&self) -> String {
		match self {
			Self::NotConnected(ctx) => ctx.trace_id.clone(),
			Self::TransactionRejected(ctx) => ctx.trace_id.clone(),
			Self::StoreError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
