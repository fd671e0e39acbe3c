//! Decoding of the mapping-value text encoding.
//!
//! Indexer endpoints return on-chain struct values as semi-structured text of
//! the form `{ field: 1u64, flag: true }`. This module extracts the named
//! fields from that encoding and re-types them defensively: malformed input
//! yields a tagged failure or a best-effort partial mapping, never a panic.

use std::collections::BTreeMap;

/// Outcome of decoding one mapping value.
///
/// `Complete` and `Partial` both carry decoded fields; `Partial` means at
/// least one segment between the braces was dropped because its key or value
/// was empty after trimming. `Malformed` means no `{...}` delimiter pair was
/// found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedMapping {
	/// Every segment between the braces produced a field
	Complete(BTreeMap<String, String>),
	/// At least one segment was dropped
	Partial(BTreeMap<String, String>),
	/// No `{...}` delimiter pair was found
	Malformed,
}

impl DecodedMapping {
	/// Borrows the decoded fields, if any.
	pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
		match self {
			DecodedMapping::Complete(fields) | DecodedMapping::Partial(fields) => Some(fields),
			DecodedMapping::Malformed => None,
		}
	}

	/// Consumes the result, yielding the decoded fields, if any.
	pub fn into_fields(self) -> Option<BTreeMap<String, String>> {
		match self {
			DecodedMapping::Complete(fields) | DecodedMapping::Partial(fields) => Some(fields),
			DecodedMapping::Malformed => None,
		}
	}

	/// Whether no `{...}` delimiter pair was found.
	pub fn is_malformed(&self) -> bool {
		matches!(self, DecodedMapping::Malformed)
	}
}

/// Decodes a mapping value into its named string fields.
///
/// Takes the substring between the outermost `{` and `}`, splits it on
/// top-level commas, then splits each segment on its first `:`. Both sides
/// are trimmed and pairs with an empty side are dropped. Nested braces and
/// brackets are kept intact inside values.
///
/// # Arguments
/// * `raw` - The mapping value text as returned by the indexer
///
/// # Returns
/// A [`DecodedMapping`] carrying the fields, or `Malformed` if `raw` has no
/// `{...}` delimiter pair
pub fn decode_mapping(raw: &str) -> DecodedMapping {
	let open = match raw.find('{') {
		Some(index) => index,
		None => return DecodedMapping::Malformed,
	};
	let close = match raw.rfind('}') {
		Some(index) => index,
		None => return DecodedMapping::Malformed,
	};
	if close <= open {
		return DecodedMapping::Malformed;
	}

	let body = &raw[open + 1..close];
	let mut fields = BTreeMap::new();
	let mut dropped = false;

	for segment in split_top_level(body) {
		let mut parts = segment.splitn(2, ':');
		let key = parts.next().unwrap_or("").trim();
		let value = parts.next().unwrap_or("").trim();
		if key.is_empty() || value.is_empty() {
			// Stray commas produce empty segments; those are not data loss
			if !segment.trim().is_empty() {
				dropped = true;
			}
			continue;
		}
		fields.insert(key.to_string(), value.to_string());
	}

	if dropped {
		DecodedMapping::Partial(fields)
	} else {
		DecodedMapping::Complete(fields)
	}
}

/// Splits on commas that sit outside any nested `{}` or `[]` pair.
fn split_top_level(body: &str) -> Vec<&str> {
	let mut segments = Vec::new();
	let mut depth: usize = 0;
	let mut start = 0;

	for (index, ch) in body.char_indices() {
		match ch {
			'{' | '[' => depth += 1,
			'}' | ']' => depth = depth.saturating_sub(1),
			',' if depth == 0 => {
				segments.push(&body[start..index]);
				start = index + 1;
			}
			_ => {}
		}
	}
	segments.push(&body[start..]);
	segments
}

/// Unwraps a suffix-typed integer such as `42u64` or `3u8`.
///
/// Parses the leading digit run and ignores the trailing type suffix,
/// defaulting to 0 when no digits are present or the value overflows.
///
/// # Arguments
/// * `raw` - The field value text
///
/// # Returns
/// The parsed integer, or 0
pub fn parse_u64_value(raw: &str) -> u64 {
	leading_digits(raw).parse().unwrap_or(0)
}

/// Unwraps a suffix-typed integer into a `u32`, defaulting to 0.
pub fn parse_u32_value(raw: &str) -> u32 {
	leading_digits(raw).parse().unwrap_or(0)
}

fn leading_digits(raw: &str) -> &str {
	let trimmed = raw.trim();
	match trimmed.find(|c: char| !c.is_ascii_digit()) {
		Some(end) => &trimmed[..end],
		None => trimmed,
	}
}

/// Decodes a boolean field by exact equality to `"true"`.
pub fn parse_bool_value(raw: &str) -> bool {
	raw.trim() == "true"
}

/// Strips one pair of surrounding double quotes, if present.
pub fn unquote_value(raw: &str) -> &str {
	let trimmed = raw.trim();
	trimmed
		.strip_prefix('"')
		.and_then(|inner| inner.strip_suffix('"'))
		.unwrap_or(trimmed)
}

/// Decodes a bracketed list such as `[a, b, c]` into its elements.
///
/// Elements are trimmed and unquoted; empty elements are dropped. Input
/// without a `[...]` delimiter pair yields an empty list.
pub fn parse_list_value(raw: &str) -> Vec<String> {
	let trimmed = raw.trim();
	let open = match trimmed.find('[') {
		Some(index) => index,
		None => return Vec::new(),
	};
	let close = match trimmed.rfind(']') {
		Some(index) => index,
		None => return Vec::new(),
	};
	if close <= open {
		return Vec::new();
	}

	split_top_level(&trimmed[open + 1..close])
		.into_iter()
		.map(|element| unquote_value(element).to_string())
		.filter(|element| !element.is_empty())
		.collect()
}
