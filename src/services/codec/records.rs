//! Typed decoders for the poll program's mapping values.
//!
//! Each decoder is a thin composition over [`decode_mapping`]: decode the
//! text, then re-type each named field with its known unit suffix. Absent or
//! unparsable fields degrade to their defaults rather than failing the whole
//! record, so one damaged mapping entry cannot break an entire listing.

use std::collections::BTreeMap;

use crate::{
	models::{
		DistributionMode, OnChainPollRecord, PollSettings, PollStatus, PoolState, StakePosition,
	},
	services::codec::mapping::{
		decode_mapping, parse_bool_value, parse_list_value, parse_u32_value, parse_u64_value,
		unquote_value, DecodedMapping,
	},
};

fn field<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> &'a str {
	fields.get(name).map(String::as_str).unwrap_or("")
}

/// Decodes one poll record mapping value.
///
/// # Arguments
/// * `id` - The mapping key, i.e. the on-chain poll identifier
/// * `raw` - The mapping value text
///
/// # Returns
/// The decoded record, or None if the value has no `{...}` delimiter pair
pub fn decode_poll_record(id: u64, raw: &str) -> Option<OnChainPollRecord> {
	let fields = match decode_mapping(raw) {
		DecodedMapping::Malformed => {
			tracing::debug!("Malformed poll record mapping value for id {}", id);
			return None;
		}
		decoded => decoded.into_fields()?,
	};

	Some(OnChainPollRecord {
		id,
		creator: unquote_value(field(&fields, "creator")).to_string(),
		title: unquote_value(field(&fields, "title")).to_string(),
		description: unquote_value(field(&fields, "description")).to_string(),
		options: parse_list_value(field(&fields, "options")),
		tallies: parse_list_value(field(&fields, "tallies"))
			.iter()
			.map(|tally| parse_u64_value(tally))
			.collect(),
		reward_per_vote: parse_u64_value(field(&fields, "reward_per_vote")),
		total_pool: parse_u64_value(field(&fields, "total_pool")),
		max_voters: parse_u32_value(field(&fields, "max_voters")),
		distribution_mode: DistributionMode::from_code(parse_u64_value(field(
			&fields,
			"distribution_mode",
		))),
		end_block: parse_u64_value(field(&fields, "end_block")),
		status: PollStatus::from_code(parse_u64_value(field(&fields, "status"))),
		token_id: unquote_value(field(&fields, "token_id")).to_string(),
		closed_at_block: parse_u64_value(field(&fields, "closed_at_block")),
	})
}

/// Decodes the funding-pool state mapping value of a poll.
///
/// # Returns
/// The decoded pool state, or None if the value has no `{...}` delimiter pair
pub fn decode_pool_state(raw: &str) -> Option<PoolState> {
	let fields = decode_mapping(raw).into_fields()?;

	Some(PoolState {
		total_funded: parse_u64_value(field(&fields, "total_funded")),
		distributed: parse_u64_value(field(&fields, "distributed")),
		remaining: parse_u64_value(field(&fields, "remaining")),
		voter_count: parse_u32_value(field(&fields, "voter_count")),
	})
}

/// Decodes a stake position mapping value.
///
/// # Returns
/// The decoded position, or None if the value has no `{...}` delimiter pair
pub fn decode_stake_position(raw: &str) -> Option<StakePosition> {
	let fields = decode_mapping(raw).into_fields()?;

	Some(StakePosition {
		poll_id: parse_u64_value(field(&fields, "poll_id")),
		amount: parse_u64_value(field(&fields, "amount")),
		locked_until_block: parse_u64_value(field(&fields, "locked_until_block")),
		claimed: parse_bool_value(field(&fields, "claimed")),
	})
}

/// Decodes the program-wide poll settings mapping value.
///
/// # Returns
/// The decoded settings, or None if the value has no `{...}` delimiter pair
pub fn decode_poll_settings(raw: &str) -> Option<PollSettings> {
	let fields = decode_mapping(raw).into_fields()?;

	Some(PollSettings {
		min_duration_blocks: parse_u64_value(field(&fields, "min_duration_blocks")),
		max_duration_blocks: parse_u64_value(field(&fields, "max_duration_blocks")),
		min_fund_amount: parse_u64_value(field(&fields, "min_fund_amount")),
		max_options: parse_u32_value(field(&fields, "max_options")),
		paused: parse_bool_value(field(&fields, "paused")),
	})
}
