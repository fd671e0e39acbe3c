//! On-chain state access through indexer endpoints.
//!
//! Provides the read side of reconciliation:
//! - Generic IndexerClient trait for querying program mappings
//! - REST implementation with weighted endpoint failover

mod client;
mod error;

pub use client::{HttpIndexerClient, IndexerClient, MappingEntry};
pub use error::IndexerError;
