//! In-memory working set of pending submissions.
//!
//! The ledger owns the ordered list the application displays: most recent
//! first, holding Pending and Failed records until they graduate to
//! confirmed polls or are dismissed. All mutation happens under a single
//! write lock so concurrent reconciler ticks and user actions cannot
//! interleave partial transitions.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{PendingSubmission, SubmissionStatus};

/// Shared, lock-guarded list of unresolved submissions.
///
/// Cloning the ledger clones the handle, not the list; every clone observes
/// the same entries.
#[derive(Clone, Debug, Default)]
pub struct SubmissionLedger {
	entries: Arc<RwLock<Vec<PendingSubmission>>>,
}

impl SubmissionLedger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a point-in-time copy of all entries, most recent first.
	pub async fn snapshot(&self) -> Vec<PendingSubmission> {
		self.entries.read().await.clone()
	}

	/// Returns the entry with the given id, if present.
	pub async fn get(&self, id: &str) -> Option<PendingSubmission> {
		self.entries
			.read()
			.await
			.iter()
			.find(|entry| entry.id == id)
			.cloned()
	}

	/// True when no entries remain in the working set.
	pub async fn is_empty(&self) -> bool {
		self.entries.read().await.is_empty()
	}

	/// True while any entry still awaits resolution or dismissal.
	pub async fn has_unresolved(&self) -> bool {
		self.entries
			.read()
			.await
			.iter()
			.any(|entry| entry.is_unresolved())
	}

	/// Inserts a freshly recorded submission at the head of the list.
	pub async fn prepend(&self, submission: PendingSubmission) {
		self.entries.write().await.insert(0, submission);
	}

	/// Replaces the whole working set with a fresh listing from the store.
	pub async fn replace_all(&self, entries: Vec<PendingSubmission>) {
		*self.entries.write().await = entries;
	}

	/// Removes the entry with the given id, returning its position and the
	/// removed record so a failed store write can put it back.
	pub async fn remove(&self, id: &str) -> Option<(usize, PendingSubmission)> {
		let mut entries = self.entries.write().await;
		let index = entries.iter().position(|entry| entry.id == id)?;
		Some((index, entries.remove(index)))
	}

	/// Reinserts a previously removed entry at its original position,
	/// clamped to the current list length.
	pub async fn restore_at(&self, index: usize, submission: PendingSubmission) {
		let mut entries = self.entries.write().await;
		let index = index.min(entries.len());
		entries.insert(index, submission);
	}

	/// Takes the entry with the given id out of the list iff it is still
	/// Pending, returning its position and the record.
	///
	/// A record that is absent or already resolved yields `None`, which is
	/// what makes confirmation non-reentrant: only one caller can ever take
	/// a given Pending entry.
	pub async fn take_pending(&self, id: &str) -> Option<(usize, PendingSubmission)> {
		let mut entries = self.entries.write().await;
		let index = entries
			.iter()
			.position(|entry| entry.id == id && entry.is_pending())?;
		Some((index, entries.remove(index)))
	}

	/// Marks a still-Pending entry as Failed in place, returning the prior
	/// record for rollback. Absent or already resolved entries yield `None`.
	pub async fn mark_failed(
		&self,
		id: &str,
		error: Option<String>,
		failed_at: DateTime<Utc>,
	) -> Option<PendingSubmission> {
		let mut entries = self.entries.write().await;
		let entry = entries
			.iter_mut()
			.find(|entry| entry.id == id && entry.is_pending())?;

		let prior = entry.clone();
		entry.status = SubmissionStatus::Failed;
		entry.failed_at = Some(failed_at);
		entry.error = error;
		Some(prior)
	}

	/// Writes back a prior version of an entry after a failed store update.
	///
	/// Falls back to prepending when the entry vanished in the meantime
	/// (a concurrent refresh may have replaced the list).
	pub async fn restore(&self, prior: PendingSubmission) {
		let mut entries = self.entries.write().await;
		match entries.iter_mut().find(|entry| entry.id == prior.id) {
			Some(entry) => *entry = prior,
			None => entries.insert(0, prior),
		}
	}
}
