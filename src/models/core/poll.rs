use serde::{Deserialize, Serialize};

/// Lifecycle status of an on-chain poll.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
	/// Accepting votes
	Active,
	/// Voting ended, rewards claimable
	Claiming,
	/// Claim window ended
	Closed,
	/// Remaining funds swept, tallies immutable
	Finalized,
}

impl PollStatus {
	/// Maps the numeric status codes used in mapping text onto the enum.
	/// Unknown codes fall back to `Active`.
	pub fn from_code(code: u64) -> Self {
		match code {
			1 => PollStatus::Claiming,
			2 => PollStatus::Closed,
			3 => PollStatus::Finalized,
			_ => PollStatus::Active,
		}
	}
}

/// How the reward pool is split among voters.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
	/// Every voter receives the same amount
	Equal,
	/// Rewards weighted by stake
	Weighted,
}

impl DistributionMode {
	/// Maps the numeric mode codes used in mapping text onto the enum.
	pub fn from_code(code: u64) -> Self {
		match code {
			1 => DistributionMode::Weighted,
			_ => DistributionMode::Equal,
		}
	}
}

/// The authoritative, chain-confirmed representation of a poll.
///
/// Assembled by the codec from mapping text; fetched read-only and never
/// locally mutated. A pending submission resolves to at most one of these.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OnChainPollRecord {
	/// On-chain sequential identifier, immutable once assigned
	pub id: u64,

	/// Address that created the poll
	pub creator: String,

	/// Poll title
	pub title: String,

	/// Poll description
	pub description: String,

	/// Ordered option labels
	pub options: Vec<String>,

	/// Vote tally per option, index-aligned with `options`
	pub tallies: Vec<u64>,

	/// Reward paid per vote, in base token units
	pub reward_per_vote: u64,

	/// Total reward pool, in base token units
	pub total_pool: u64,

	/// Maximum number of voters
	pub max_voters: u32,

	/// How the reward pool is split
	pub distribution_mode: DistributionMode,

	/// Block height at which voting ends
	pub end_block: u64,

	/// Lifecycle status
	pub status: PollStatus,

	/// Identifier of the funding token
	pub token_id: String,

	/// Block height at which the poll was closed, 0 while open
	pub closed_at_block: u64,
}

/// Funding-pool state of a single poll, decoded from mapping text.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PoolState {
	/// Total amount escrowed into the pool
	pub total_funded: u64,

	/// Amount already distributed to voters
	pub distributed: u64,

	/// Amount still claimable
	pub remaining: u64,

	/// Number of voters who participated
	pub voter_count: u32,
}

/// A single account's stake against a poll, decoded from mapping text.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StakePosition {
	/// Poll the stake applies to
	pub poll_id: u64,

	/// Staked amount in base token units
	pub amount: u64,

	/// Block height until which the stake is locked
	pub locked_until_block: u64,

	/// Whether the reward for this stake has been claimed
	pub claimed: bool,
}

/// Program-wide poll settings, decoded from mapping text.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PollSettings {
	/// Minimum allowed poll duration in blocks
	pub min_duration_blocks: u64,

	/// Maximum allowed poll duration in blocks
	pub max_duration_blocks: u64,

	/// Minimum amount required to fund a poll
	pub min_fund_amount: u64,

	/// Maximum number of options per poll
	pub max_options: u32,

	/// Whether poll creation is currently paused program-wide
	pub paused: bool,
}
