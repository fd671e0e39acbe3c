use serde::{Deserialize, Serialize};

use crate::models::SecretValue;

/// Configuration for a chain deployment the reconciler talks to.
///
/// A network bundles the indexer endpoints serving on-chain mapping state,
/// the poll program deployed on that chain, the durable pending-store API
/// for that deployment, and the polling cadence of the reconciler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Network {
	/// Unique identifier for this network
	pub slug: String,

	/// Human-readable name of the network
	pub name: String,

	/// List of indexer endpoints with their weights for failover ordering
	pub indexer_urls: Vec<IndexerUrl>,

	/// On-chain program whose mappings hold the poll state
	pub program_id: String,

	/// Base URL of the durable pending-store HTTP API (can be a secret value)
	pub store_url: SecretValue,

	/// Tick interval in milliseconds while unresolved submissions exist
	pub aggressive_interval_ms: u64,

	/// Tick interval in milliseconds while the pending set is empty
	pub normal_interval_ms: u64,

	/// Page size used when listing mapping values from the indexer
	pub page_limit: Option<u32>,
}

impl Network {
	/// Page size to request from the indexer when none is configured.
	pub fn effective_page_limit(&self) -> u32 {
		self.page_limit.unwrap_or(crate::utils::DEFAULT_PAGE_LIMIT)
	}
}

/// Indexer endpoint configuration with failover weight
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndexerUrl {
	/// Type of endpoint (e.g. "rest")
	pub type_: String,

	/// URL of the indexer endpoint (can be a secret value)
	pub url: SecretValue,

	/// Weight for primary selection (0-100); highest weight is tried first
	pub weight: u32,
}
