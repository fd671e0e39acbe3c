//! Property-based tests for the mapping-value text decoder.
//! The decoder is total: any input string yields a tagged result without
//! panicking, and decoded keys and values are never empty.

use crate::properties::strategies::mapping_fields_strategy;

use proptest::{prelude::*, test_runner::Config};
use zkpoll_reconciler::services::codec::{
	decode_mapping, parse_bool_value, parse_list_value, parse_u32_value, parse_u64_value,
	unquote_value, DecodedMapping,
};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Totality: arbitrary input never panics and never produces empty keys or values
	#[test]
	fn test_decode_mapping_total(raw in any::<String>()) {
		let decoded = decode_mapping(&raw);

		if let Some(fields) = decoded.fields() {
			prop_assert!(fields.keys().all(|key| !key.is_empty()));
			prop_assert!(fields.values().all(|value| !value.is_empty()));
		}
	}

	// Input without both braces is always malformed
	#[test]
	fn test_decode_mapping_rejects_braceless_input(raw in "[^{}]*") {
		prop_assert_eq!(decode_mapping(&raw), DecodedMapping::Malformed);
	}

	// Encoding a field map and decoding it again is the identity
	#[test]
	fn test_decode_mapping_roundtrip(fields in mapping_fields_strategy()) {
		let body = fields
			.iter()
			.map(|(key, value)| format!("{}: {}", key, value))
			.collect::<Vec<_>>()
			.join(", ");
		let raw = format!("{{{}}}", body);

		prop_assert_eq!(decode_mapping(&raw), DecodedMapping::Complete(fields));
	}

	// Surrounding noise outside the braces does not change the decoded fields
	#[test]
	fn test_decode_mapping_ignores_surrounding_noise(
		fields in mapping_fields_strategy(),
		prefix in "[^{}]{0,10}",
		suffix in "[^{}]{0,10}",
	) {
		let body = fields
			.iter()
			.map(|(key, value)| format!("{}: {}", key, value))
			.collect::<Vec<_>>()
			.join(", ");
		let bare = format!("{{{}}}", body);
		let noisy = format!("{}{}{}", prefix, bare, suffix);

		prop_assert_eq!(decode_mapping(&noisy), decode_mapping(&bare));
	}

	// Suffix-typed integers round-trip for every in-range value and suffix
	#[test]
	fn test_parse_u64_value_roundtrip(
		value in any::<u64>(),
		suffix in prop_oneof![Just("u8"), Just("u16"), Just("u32"), Just("u64"), Just("u128"), Just("")],
	) {
		prop_assert_eq!(parse_u64_value(&format!("{}{}", value, suffix)), value);
	}

	// Non-numeric input degrades to zero instead of failing
	#[test]
	fn test_parse_u64_value_total(raw in any::<String>()) {
		let parsed = parse_u64_value(&raw);
		if !raw.trim().starts_with(|c: char| c.is_ascii_digit()) {
			prop_assert_eq!(parsed, 0);
		}
	}

	#[test]
	fn test_parse_u32_value_roundtrip(value in any::<u32>()) {
		prop_assert_eq!(parse_u32_value(&format!("{}u32", value)), value);
	}

	// Only the exact token "true" decodes as true
	#[test]
	fn test_parse_bool_value_total(raw in any::<String>()) {
		prop_assert_eq!(parse_bool_value(&raw), raw.trim() == "true");
	}

	// Quoting and unquoting is the identity for quote-free text
	#[test]
	fn test_unquote_value_strips_one_quote_pair(inner in "[a-zA-Z0-9 ?!.]*") {
		let quoted = format!("\"{}\"", inner);
		prop_assert_eq!(unquote_value(&quoted), inner.as_str());
	}

	#[test]
	fn test_unquote_value_total(raw in any::<String>()) {
		// Must not panic; quote-free trimmed input passes through unchanged
		let unquoted = unquote_value(&raw);
		if !raw.contains('"') {
			prop_assert_eq!(unquoted, raw.trim());
		}
	}

	// Bracketed lists of quoted elements round-trip
	#[test]
	fn test_parse_list_value_roundtrip(
		elements in prop::collection::vec("[a-zA-Z0-9 ?!.]{1,12}", 0..8)
	) {
		let encoded = format!(
			"[{}]",
			elements
				.iter()
				.map(|element| format!("\"{}\"", element))
				.collect::<Vec<_>>()
				.join(", ")
		);

		prop_assert_eq!(parse_list_value(&encoded), elements);
	}

	#[test]
	fn test_parse_list_value_total(raw in any::<String>()) {
		// Must not panic; decoded elements are never empty
		prop_assert!(parse_list_value(&raw).iter().all(|element| !element.is_empty()));
	}
}
