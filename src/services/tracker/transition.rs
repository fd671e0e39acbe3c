//! Submission state transitions.
//!
//! Applies the two terminal transitions a pending submission can take,
//! keeping the in-memory ledger and the durable store in agreement: the
//! ledger moves first, the store is asked to persist, and a store refusal
//! or outage puts the ledger entry back exactly where it was.

use chrono::Utc;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::PendingSubmission,
	services::{
		notification::Notifier,
		tracker::{error::TrackerError, ledger::SubmissionLedger, storage::PendingStore},
	},
};

/// Moves submissions out of the Pending state.
///
/// `confirm` resolves a submission against an on-chain poll and drops it
/// from the working set; `fail` keeps the record visible, flipped to
/// Failed, until the user dismisses it. Both persist synchronously and
/// roll the in-memory change back when the store does not accept it.
pub struct StateTransitioner<S: PendingStore> {
	ledger: SubmissionLedger,
	store: Arc<S>,
	notifier: Option<Arc<dyn Notifier>>,
}

impl<S: PendingStore> StateTransitioner<S> {
	/// Creates a transitioner over a shared ledger and store
	///
	/// # Arguments
	/// * `ledger` - Shared in-memory working set, cloned handle
	/// * `store` - Durable store client
	/// * `notifier` - Channel announcing confirmations, `None` to log only
	pub fn new(
		ledger: SubmissionLedger,
		store: Arc<S>,
		notifier: Option<Arc<dyn Notifier>>,
	) -> Self {
		Self {
			ledger,
			store,
			notifier,
		}
	}

	/// Confirms a pending submission against its on-chain poll
	///
	/// Only a submission currently in the Pending state can confirm, and a
	/// given submission confirms at most once: the entry is taken out of
	/// the ledger before the store call, so a concurrent caller observes a
	/// missing entry and gets `Ok(false)`.
	///
	/// # Arguments
	/// * `id` - Local identifier of the submission
	/// * `on_chain_id` - Sequential id of the matched on-chain poll
	///
	/// # Returns
	/// * `Result<bool, TrackerError>` - `true` when the transition was applied,
	///   `false` when there was nothing to confirm, error when the store
	///   rejected the update
	pub async fn confirm(&self, id: &str, on_chain_id: u64) -> Result<bool, TrackerError> {
		let Some((index, submission)) = self.ledger.take_pending(id).await else {
			tracing::debug!("No pending submission {} to confirm", id);
			return Ok(false);
		};

		match self.store.confirm_pending(id, on_chain_id).await {
			Ok(true) => {
				tracing::info!(
					"Submission '{}' ({}) confirmed as on-chain poll {}",
					submission.title,
					id,
					on_chain_id
				);
				self.announce(&submission, on_chain_id).await;
				Ok(true)
			}
			Ok(false) => {
				self.ledger.restore_at(index, submission).await;
				tracing::warn!("Store refused to confirm submission {}", id);
				Ok(false)
			}
			Err(e) => {
				self.ledger.restore_at(index, submission).await;
				Err(e)
			}
		}
	}

	/// Marks a pending submission failed
	///
	/// The record stays in the ledger, flipped to Failed, so the user can
	/// read the failure and dismiss it. An absent message is persisted as
	/// such and rendered as an unknown failure.
	///
	/// # Arguments
	/// * `id` - Local identifier of the submission
	/// * `error_message` - Underlying failure detail, when one is known
	///
	/// # Returns
	/// * `Result<bool, TrackerError>` - `true` when the transition was applied,
	///   `false` when the submission was not pending, error when the store
	///   rejected the update
	pub async fn fail(
		&self,
		id: &str,
		error_message: Option<String>,
	) -> Result<bool, TrackerError> {
		let Some(prior) = self
			.ledger
			.mark_failed(id, error_message.clone(), Utc::now())
			.await
		else {
			tracing::debug!("No pending submission {} to fail", id);
			return Ok(false);
		};

		match self.store.fail_pending(id, error_message.clone()).await {
			Ok(true) => {
				tracing::info!(
					"Submission '{}' ({}) marked failed: {}",
					prior.title,
					id,
					error_message.as_deref().unwrap_or("unknown failure")
				);
				Ok(true)
			}
			Ok(false) => {
				self.ledger.restore(prior).await;
				tracing::warn!("Store refused to fail submission {}", id);
				Ok(false)
			}
			Err(e) => {
				self.ledger.restore(prior).await;
				Err(e)
			}
		}
	}

	/// Delivers the confirmation notification, logging instead of failing
	/// the already-persisted transition when delivery breaks.
	async fn announce(&self, submission: &PendingSubmission, on_chain_id: u64) {
		let Some(notifier) = &self.notifier else {
			return;
		};

		let variables = notification_variables(submission, on_chain_id);
		if let Err(e) = notifier.notify(&variables).await {
			tracing::warn!(
				"Failed to deliver confirmation notification for submission {}: {}",
				submission.id,
				e
			);
		}
	}
}

/// Variables available to notification message templates
fn notification_variables(
	submission: &PendingSubmission,
	on_chain_id: u64,
) -> HashMap<String, String> {
	let mut variables = HashMap::from([
		("id".to_string(), submission.id.clone()),
		("title".to_string(), submission.title.clone()),
		("on_chain_id".to_string(), on_chain_id.to_string()),
		("address".to_string(), submission.wallet_address.clone()),
		("network".to_string(), submission.network.clone()),
	]);
	if let Some(tx_hash) = &submission.tx_hash {
		variables.insert("tx_hash".to_string(), tx_hash.clone());
	}
	variables
}
