//! Pending-submission tracking service.
//!
//! Front door for the wallet session: records poll-creation intents the
//! moment the wallet signs them, keeps the user-visible working set
//! ordered most recent first, and lets the owner dismiss records they no
//! longer care about. Creation is fail-closed: a submission that cannot
//! be durably recorded is not tracked at all.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
	models::{NewSubmission, PendingSubmission, SubmissionStatus},
	services::{
		tracker::{error::TrackerError, ledger::SubmissionLedger, storage::PendingStore},
		wallet::WalletProvider,
	},
};

/// Tracks poll submissions for the currently connected wallet.
///
/// All mutating operations require a connected wallet address; the address
/// is injected here rather than carried by the submission input.
pub struct SubmissionTracker<S: PendingStore> {
	ledger: SubmissionLedger,
	store: Arc<S>,
	connected: RwLock<Option<String>>,
	network: String,
}

impl<S: PendingStore> SubmissionTracker<S> {
	/// Creates a tracker for one network over a shared ledger and store
	///
	/// # Arguments
	/// * `network` - Slug of the network submissions are recorded against
	/// * `ledger` - Shared in-memory working set, cloned handle
	/// * `store` - Durable store client
	pub fn new(network: impl Into<String>, ledger: SubmissionLedger, store: Arc<S>) -> Self {
		Self {
			ledger,
			store,
			connected: RwLock::new(None),
			network: network.into(),
		}
	}

	/// Connects a wallet address, replacing any previous session
	pub async fn connect(&self, address: impl Into<String>) {
		let address = address.into();
		tracing::info!("Wallet {} connected", address);
		*self.connected.write().await = Some(address);
	}

	/// Disconnects the current wallet session
	pub async fn disconnect(&self) {
		if let Some(address) = self.connected.write().await.take() {
			tracing::info!("Wallet {} disconnected", address);
		}
	}

	/// Address of the currently connected wallet, if any
	pub async fn connected_address(&self) -> Option<String> {
		self.connected.read().await.clone()
	}

	/// The tracked submissions, most recent first
	pub async fn submissions(&self) -> Vec<PendingSubmission> {
		self.ledger.snapshot().await
	}

	async fn require_connected(&self) -> Result<String, TrackerError> {
		self.connected.read().await.clone().ok_or_else(|| {
			TrackerError::not_connected("No wallet connected", None, None)
		})
	}

	/// Records a signed submission for the connected wallet
	///
	/// Amounts are canonicalized to their minimal fixed-precision form
	/// before anything is persisted, so `0.2500` and `0.25` store as the
	/// same value. When the durable store cannot accept the record the
	/// submission is not tracked anywhere.
	///
	/// # Arguments
	/// * `input` - The authored poll fields, with the transaction hash the
	///   wallet returned, when it returned one
	///
	/// # Returns
	/// * `Result<PendingSubmission, TrackerError>` - The durably created record
	pub async fn record(&self, input: NewSubmission) -> Result<PendingSubmission, TrackerError> {
		let address = self.require_connected().await?;

		let mut input = input;
		input.reward_per_vote = input.reward_per_vote.normalize();
		input.fund_amount = input.fund_amount.normalize();

		let created = self.store.create_pending(&input, &address).await?;
		self.ledger.prepend(created.clone()).await;

		tracing::info!(
			"Recorded pending submission '{}' ({})",
			created.title,
			created.id
		);
		Ok(created)
	}

	/// Removes a tracked submission on behalf of its owner
	///
	/// Dismissal is idempotent: an id that is not tracked, or not owned by
	/// the connected wallet, reports `false` instead of an error.
	///
	/// # Arguments
	/// * `id` - Local identifier of the submission
	///
	/// # Returns
	/// * `Result<bool, TrackerError>` - `true` when a record was removed
	pub async fn dismiss(&self, id: &str) -> Result<bool, TrackerError> {
		let address = self.require_connected().await?;

		let Some((index, removed)) = self.ledger.remove(id).await else {
			return Ok(false);
		};

		if removed.wallet_address != address {
			tracing::warn!(
				"Wallet {} attempted to dismiss submission {} owned by {}",
				address,
				id,
				removed.wallet_address
			);
			self.ledger.restore_at(index, removed).await;
			return Ok(false);
		}

		match self.store.delete_pending(id, &address).await {
			Ok(true) => {
				tracing::info!("Dismissed submission {}", id);
				Ok(true)
			}
			Ok(false) => {
				self.ledger.restore_at(index, removed).await;
				tracing::warn!("Store refused to delete submission {}", id);
				Ok(false)
			}
			Err(e) => {
				self.ledger.restore_at(index, removed).await;
				Err(e)
			}
		}
	}

	/// Broadcasts a poll creation through the wallet and tracks the result
	///
	/// On success the returned transaction hash, when the wallet produced
	/// one, is attached to the recorded submission. A wallet rejection is
	/// recorded as an already-failed submission so the user can read the
	/// reason and retry, and then reported as an error.
	///
	/// # Arguments
	/// * `wallet` - The wallet provider signing the transaction
	/// * `input` - The authored poll fields
	///
	/// # Returns
	/// * `Result<PendingSubmission, TrackerError>` - The tracked record
	pub async fn submit(
		&self,
		wallet: &dyn WalletProvider,
		input: NewSubmission,
	) -> Result<PendingSubmission, TrackerError> {
		let address = self.require_connected().await?;

		match wallet.create_poll(&input).await {
			Ok(tx_hash) => {
				let mut input = input;
				input.tx_hash = tx_hash;
				self.record(input).await
			}
			Err(e) => {
				let message = e.to_string();
				self.record_rejection(&input, &address, &message).await;
				Err(TrackerError::transaction_rejected(
					message,
					Some(e.into()),
					None,
				))
			}
		}
	}

	/// Reloads the working set from the durable store
	///
	/// # Returns
	/// * `Result<Vec<PendingSubmission>, TrackerError>` - The refreshed set,
	///   most recent first as the store returns it
	pub async fn refresh(&self) -> Result<Vec<PendingSubmission>, TrackerError> {
		let address = self.require_connected().await?;

		let submissions = self.store.list_pending(&address, &self.network).await?;
		self.ledger.replace_all(submissions.clone()).await;

		tracing::debug!(
			"Refreshed {} tracked submissions for {}",
			submissions.len(),
			address
		);
		Ok(submissions)
	}

	/// Persists a wallet-rejected submission as Failed so the rejection
	/// survives a reload. Best effort: when the store is down the rejection
	/// is only logged.
	async fn record_rejection(&self, input: &NewSubmission, address: &str, message: &str) {
		match self.store.create_pending(input, address).await {
			Ok(created) => {
				if let Err(e) = self
					.store
					.fail_pending(&created.id, Some(message.to_string()))
					.await
				{
					tracing::warn!(
						"Could not mark rejected submission {} failed: {}",
						created.id,
						e
					);
				}

				let mut failed = created;
				failed.status = SubmissionStatus::Failed;
				failed.failed_at = Some(Utc::now());
				failed.error = Some(message.to_string());
				self.ledger.prepend(failed).await;
			}
			Err(e) => {
				tracing::warn!(
					"Could not record rejected submission '{}': {}",
					input.title,
					e
				);
			}
		}
	}
}
