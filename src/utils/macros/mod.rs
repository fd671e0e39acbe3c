//! Macros for common functionality.
//!
//! - deserialization: Case-insensitive enum deserialization

pub mod deserialization;
