//! Wallet service error types and handling.
//!
//! Covers the failure modes of wallet-backed transaction submission:
//! missing wallet sessions, rejected transactions and transport faults.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur during wallet operations
#[derive(ThisError, Debug)]
pub enum WalletError {
	/// No wallet session is active for an operation that requires one
	#[error("Not connected: {0}")]
	NotConnected(ErrorContext),

	/// The wallet or the chain declined the transaction
	#[error("Transaction rejected: {0}")]
	TransactionRejected(ErrorContext),

	/// Internal errors within the wallet provider
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl WalletError {
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

	// Internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for WalletError {
	fn trace_id(&self) -> String {
		match self {
			Self::NotConnected(ctx) => ctx.trace_id.clone(),
			Self::TransactionRejected(ctx) => ctx.trace_id.clone(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
