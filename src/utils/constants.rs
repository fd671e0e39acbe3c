//! Constants used across the application.

/// Documentation URL referenced in operator-facing error messages
pub const DOCUMENTATION_URL: &str = "https://docs.zkpoll.io/reconciler";

/// Page size requested from the indexer when a network does not configure one
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Tick interval in milliseconds while unresolved submissions exist
pub const DEFAULT_AGGRESSIVE_INTERVAL_MS: u64 = 5_000;

/// Tick interval in milliseconds while the pending set is empty
pub const DEFAULT_NORMAL_INTERVAL_MS: u64 = 15_000;
