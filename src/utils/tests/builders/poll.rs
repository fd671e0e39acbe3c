//! Test helper utilities for on-chain poll records
//!
//! - `PollRecordBuilder`: Builder for creating test OnChainPollRecord instances

use crate::models::{DistributionMode, OnChainPollRecord, PollStatus};

/// Builder for creating test OnChainPollRecord instances
pub struct PollRecordBuilder {
	id: u64,
	creator: String,
	title: String,
	description: String,
	options: Vec<String>,
	tallies: Vec<u64>,
	reward_per_vote: u64,
	total_pool: u64,
	max_voters: u32,
	distribution_mode: DistributionMode,
	end_block: u64,
	status: PollStatus,
	token_id: String,
	closed_at_block: u64,
}

impl Default for PollRecordBuilder {
	fn default() -> Self {
		Self {
			id: 1,
			creator: "aleo1qnr4dkkvkgfqph0vzc3y6z2eu975wnpz2925ntjccd5cfqxtyu8s7pyjh9"
				.to_string(),
			title: "Test Poll".to_string(),
			description: "Test poll description".to_string(),
			options: vec!["Yes".to_string(), "No".to_string()],
			tallies: vec![0, 0],
			reward_per_vote: 100_000,
			total_pool: 10_000_000,
			max_voters: 100,
			distribution_mode: DistributionMode::Equal,
			end_block: 5_000,
			status: PollStatus::Active,
			token_id: "credits".to_string(),
			closed_at_block: 0,
		}
	}
}

impl PollRecordBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn id(mut self, id: u64) -> Self {
		self.id = id;
		self
	}

	pub fn creator(mut self, creator: &str) -> Self {
		self.creator = creator.to_string();
		self
	}

	pub fn title(mut self, title: &str) -> Self {
		self.title = title.to_string();
		self
	}

	pub fn description(mut self, description: &str) -> Self {
		self.description = description.to_string();
		self
	}

	pub fn options(mut self, options: Vec<&str>) -> Self {
		self.tallies = vec![0; options.len()];
		self.options = options.into_iter().map(|o| o.to_string()).collect();
		self
	}

	pub fn tallies(mut self, tallies: Vec<u64>) -> Self {
		self.tallies = tallies;
		self
	}

	pub fn status(mut self, status: PollStatus) -> Self {
		self.status = status;
		self
	}

	pub fn end_block(mut self, end_block: u64) -> Self {
		self.end_block = end_block;
		self
	}

	pub fn closed_at_block(mut self, block: u64) -> Self {
		self.closed_at_block = block;
		self
	}

	pub fn build(self) -> OnChainPollRecord {
		OnChainPollRecord {
			id: self.id,
			creator: self.creator,
			title: self.title,
			description: self.description,
			options: self.options,
			tallies: self.tallies,
			reward_per_vote: self.reward_per_vote,
			total_pool: self.total_pool,
			max_voters: self.max_voters,
			distribution_mode: self.distribution_mode,
			end_block: self.end_block,
			status: self.status,
			token_id: self.token_id,
			closed_at_block: self.closed_at_block,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_poll_record() {
		let record = PollRecordBuilder::new().build();

		assert_eq!(record.id, 1);
		assert_eq!(record.title, "Test Poll");
		assert_eq!(record.status, PollStatus::Active);
		assert_eq!(record.options.len(), record.tallies.len());
		assert_eq!(record.closed_at_block, 0);
	}

	#[test]
	fn test_options_setter_resizes_tallies() {
		let record = PollRecordBuilder::new()
			.options(vec!["A", "B", "C"])
			.build();

		assert_eq!(record.options.len(), 3);
		assert_eq!(record.tallies, vec![0, 0, 0]);
	}

	#[test]
	fn test_builder_methods() {
		let record = PollRecordBuilder::new()
			.id(42)
			.creator("aleo1creator")
			.title("Quorum size")
			.status(PollStatus::Claiming)
			.end_block(9_999)
			.closed_at_block(9_000)
			.tallies(vec![3, 7])
			.build();

		assert_eq!(record.id, 42);
		assert_eq!(record.creator, "aleo1creator");
		assert_eq!(record.title, "Quorum size");
		assert_eq!(record.status, PollStatus::Claiming);
		assert_eq!(record.end_block, 9_999);
		assert_eq!(record.closed_at_block, 9_000);
		assert_eq!(record.tallies, vec![3, 7]);
	}
}
