//! Pending submission matching functionality.
//!
//! Implements the logic that pairs locally recorded pending submissions
//! with poll records observed on chain:
//! - Generic MatchStrategy trait for pluggable matching rules
//! - Title and creator based default strategy
//! - Listing scan that settles duplicates by first appearance

use crate::{
	models::{OnChainPollRecord, PendingSubmission},
	utils::normalize_string,
};

/// Trait for deciding whether an on-chain poll record corresponds to a
/// pending submission.
///
/// Implementations must be pure: the same pending submission and candidate
/// record always produce the same answer, with no side effects. This keeps
/// reconciliation ticks deterministic regardless of listing order or timing.
pub trait MatchStrategy: Send + Sync {
	/// Returns true when `candidate` is the on-chain counterpart of `pending`.
	///
	/// # Arguments
	///
	/// * `pending` - The locally recorded submission awaiting confirmation
	/// * `candidate` - A poll record fetched from the on-chain listing
	fn matches(&self, pending: &PendingSubmission, candidate: &OnChainPollRecord) -> bool;
}

/// Default matching strategy: case-insensitive equality of title and creator.
///
/// A candidate matches when its normalized title equals the pending
/// submission's normalized title AND its creator equals the submitting wallet
/// address. No other field participates in the comparison, so two on-chain
/// records sharing the same title and creator are indistinguishable to this
/// strategy. [`find_match`] settles that ambiguity by taking the record that
/// appears first in the listing.
#[derive(Debug, Clone, Default)]
pub struct TitleCreatorMatcher {}

impl TitleCreatorMatcher {
	pub fn new() -> Self {
		TitleCreatorMatcher {}
	}
}

impl MatchStrategy for TitleCreatorMatcher {
	fn matches(&self, pending: &PendingSubmission, candidate: &OnChainPollRecord) -> bool {
		normalize_string(&candidate.title) == normalize_string(&pending.title)
			&& normalize_string(&candidate.creator) == normalize_string(&pending.wallet_address)
	}
}

/// Scans an on-chain listing for the first record matching a pending
/// submission.
///
/// Candidates are visited in listing order and the first match wins, so when
/// several records would satisfy the strategy the earliest one is returned
/// on every call.
///
/// # Arguments
///
/// * `strategy` - The matching rule to apply
/// * `pending` - The pending submission to resolve
/// * `candidates` - Poll records fetched from the on-chain listing
///
/// # Returns
///
/// Returns `Some(record)` for the first matching candidate, otherwise `None`.
pub fn find_match<'a>(
	strategy: &dyn MatchStrategy,
	pending: &PendingSubmission,
	candidates: &'a [OnChainPollRecord],
) -> Option<&'a OnChainPollRecord> {
	candidates
		.iter()
		.find(|candidate| strategy.matches(pending, candidate))
}
