//! Parsing utilities
//!
//! Small parsing helpers shared by the CLI and the matching logic.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a string argument into a `u64` value representing a file size.
///
/// Accepts human-readable formats like "1GB", "500MB", "1024KB", etc.
/// Returns an error if the format is invalid. Used for the log rotation
/// size limit.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Normalizes a string by trimming whitespace and converting to lowercase.
///
/// Poll titles and creator addresses are compared in this normalized form,
/// and configuration name uniqueness checks use it as well.
///
/// # Arguments
/// * `input` - The string to normalize
///
/// # Returns
/// * `String` - The normalized string (trimmed and lowercase)
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
