//! Wallet provider interface.
//!
//! Defines the boundary to the wallet that signs and broadcasts
//! transactions on behalf of the user. The reconciler never interprets
//! wallet-internal failures beyond their message text; it consumes the
//! returned transaction handle and nothing else.

mod error;

pub use error::WalletError;

use async_trait::async_trait;

use crate::models::NewSubmission;

/// Defines the core interface for wallet providers
///
/// This trait must be implemented by all wallet integrations to provide
/// standardized transaction submission. A successful call may still yield
/// `None` when the wallet executes the transaction without returning a
/// handle; rejection is reported as an error.
#[async_trait]
pub trait WalletProvider: Send + Sync {
	/// Executes an arbitrary program function through the wallet
	///
	/// # Arguments
	///
	/// * `program_id` - The program the function belongs to
	/// * `function_name` - The function to invoke
	/// * `inputs` - Encoded function inputs, in declaration order
	///
	/// # Returns
	///
	/// * `Result<Option<String>, WalletError>` - The transaction hash when the
	///   wallet returned one, `None` when it did not, or an error on rejection
	async fn execute_transaction(
		&self,
		program_id: &str,
		function_name: &str,
		inputs: &[String],
	) -> Result<Option<String>, WalletError>;

	/// Submits a poll creation transaction built from the given fields
	///
	/// # Arguments
	///
	/// * `submission` - The authored poll fields to put on chain
	///
	/// # Returns
	///
	/// * `Result<Option<String>, WalletError>` - The transaction hash when the
	///   wallet returned one, `None` when it did not, or an error on rejection
	async fn create_poll(&self, submission: &NewSubmission)
		-> Result<Option<String>, WalletError>;
}
