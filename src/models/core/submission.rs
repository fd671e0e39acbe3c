use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a locally tracked poll submission.
///
/// A submission starts `Pending` the moment the wallet signs it and moves to
/// exactly one of `Confirmed` or `Failed`. Dismissal deletes the record
/// instead of transitioning it further.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
	/// Broadcast locally, not yet observed on chain
	Pending,
	/// Matched to an on-chain poll record
	Confirmed,
	/// Rejected, expired or otherwise known not to have landed
	Failed,
}

/// Vote privacy of a poll
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMode {
	/// Individual votes readable on chain
	Public,
	/// Individual votes encrypted, only tallies readable
	Private,
}

/// Listing visibility of a poll
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	/// Shown in the public directory
	Public,
	/// Reachable only by direct link
	Unlisted,
}

/// A locally tracked record of a poll-creation intent whose on-chain
/// finality is not yet known.
///
/// The identity is a locally generated UUID string, distinct from any
/// on-chain identifier. Exactly one of the following holds at any time:
/// `Confirmed` with `on_chain_id` set, `Failed`, or `Pending` with
/// `on_chain_id`, `confirmed_at` and `failed_at` all unset.
///
/// Serialized in camelCase to match the durable-store wire format.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmission {
	/// Locally generated identifier (UUID v4)
	pub id: String,

	/// Address of the wallet that signed the submission
	pub wallet_address: String,

	/// Transaction hash returned by the wallet, when one was returned at all
	pub tx_hash: Option<String>,

	/// Poll title as authored
	pub title: String,

	/// Poll description as authored
	#[serde(default)]
	pub description: String,

	/// Ordered option labels
	pub options: Vec<String>,

	/// Reward paid per vote, in token units (fixed precision, never float)
	pub reward_per_vote: Decimal,

	/// Maximum number of voters
	pub max_voters: u32,

	/// Poll duration in chain blocks
	pub duration_blocks: u64,

	/// Total amount escrowed to fund rewards (fixed precision, never float)
	pub fund_amount: Decimal,

	/// Identifier of the funding token
	pub token_id: String,

	/// Vote privacy of the poll
	pub privacy_mode: PrivacyMode,

	/// Listing visibility of the poll
	pub visibility: Visibility,

	/// Lifecycle status
	pub status: SubmissionStatus,

	/// On-chain poll identifier, set once confirmed
	pub on_chain_id: Option<u64>,

	/// Slug of the network the submission targets
	pub network: String,

	/// When the wallet signed the submission
	pub created_at: DateTime<Utc>,

	/// When the submission was matched on chain
	pub confirmed_at: Option<DateTime<Utc>>,

	/// When the submission was marked failed
	pub failed_at: Option<DateTime<Utc>>,

	/// Failure detail, absent means "unknown failure"
	pub error: Option<String>,

	/// Deadline after which the submission is considered lost
	pub expires_at: Option<DateTime<Utc>>,
}

impl PendingSubmission {
	/// True while the submission awaits on-chain resolution.
	pub fn is_pending(&self) -> bool {
		self.status == SubmissionStatus::Pending
	}

	/// True while the submission still demands attention from the poller:
	/// either awaiting resolution or failed but not yet dismissed.
	pub fn is_unresolved(&self) -> bool {
		matches!(
			self.status,
			SubmissionStatus::Pending | SubmissionStatus::Failed
		)
	}

	/// True once the expiry deadline has passed for a still-pending record.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.is_pending()
			&& self
				.expires_at
				.map(|deadline| deadline <= now)
				.unwrap_or(false)
	}

	/// Failure detail for display, resolving an absent message.
	pub fn display_error(&self) -> &str {
		self.error.as_deref().unwrap_or("unknown failure")
	}

	/// Checks that the status and its dependent fields agree: Confirmed
	/// carries an on-chain id and a confirmation time, Failed carries a
	/// failure time, Pending carries none of the three.
	pub fn status_fields_agree(&self) -> bool {
		match self.status {
			SubmissionStatus::Pending => {
				self.on_chain_id.is_none()
					&& self.confirmed_at.is_none()
					&& self.failed_at.is_none()
			}
			SubmissionStatus::Confirmed => {
				self.on_chain_id.is_some() && self.confirmed_at.is_some() && self.failed_at.is_none()
			}
			SubmissionStatus::Failed => self.on_chain_id.is_none() && self.failed_at.is_some(),
		}
	}
}

/// All poll-authoring fields needed to record a new submission.
///
/// The wallet address is not part of the input: the tracker injects the
/// currently connected address and refuses to record without one.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
	/// Poll title
	pub title: String,

	/// Poll description
	#[serde(default)]
	pub description: String,

	/// Ordered option labels
	pub options: Vec<String>,

	/// Reward paid per vote, in token units
	pub reward_per_vote: Decimal,

	/// Maximum number of voters
	pub max_voters: u32,

	/// Poll duration in chain blocks
	pub duration_blocks: u64,

	/// Total amount escrowed to fund rewards
	pub fund_amount: Decimal,

	/// Identifier of the funding token
	pub token_id: String,

	/// Vote privacy of the poll
	pub privacy_mode: PrivacyMode,

	/// Listing visibility of the poll
	pub visibility: Visibility,

	/// Transaction hash, when the wallet returned one
	pub tx_hash: Option<String>,

	/// Slug of the network the submission targets
	pub network: String,

	/// Optional deadline after which the submission counts as lost
	pub expires_at: Option<DateTime<Utc>>,
}
