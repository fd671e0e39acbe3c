//! Mapping-value codec.
//!
//! Decodes the semi-structured textual encoding of on-chain state served by
//! indexer endpoints into typed domain records:
//! - Total, never-panicking primitive for `{field: value, ...}` text
//! - Typed field helpers for suffix-typed integers, booleans and lists
//! - Record decoders for polls, pool state, stake positions and settings

mod mapping;
mod records;

pub use mapping::{
	decode_mapping, parse_bool_value, parse_list_value, parse_u32_value, parse_u64_value,
	unquote_value, DecodedMapping,
};
pub use records::{
	decode_poll_record, decode_poll_settings, decode_pool_state, decode_stake_position,
};
