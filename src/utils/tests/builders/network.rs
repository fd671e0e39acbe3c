//! Test helper utilities for Network configuration
//!
//! - `NetworkBuilder`: Builder for creating test Network instances

use crate::models::{IndexerUrl, Network, SecretString, SecretValue};
use crate::utils::{DEFAULT_AGGRESSIVE_INTERVAL_MS, DEFAULT_NORMAL_INTERVAL_MS};

/// Builder for creating test Network instances
pub struct NetworkBuilder {
	name: String,
	slug: String,
	indexer_urls: Vec<IndexerUrl>,
	program_id: String,
	store_url: SecretValue,
	aggressive_interval_ms: u64,
	normal_interval_ms: u64,
	page_limit: Option<u32>,
}

impl Default for NetworkBuilder {
	fn default() -> Self {
		Self {
			name: "Test Network".to_string(),
			slug: "test_network".to_string(),
			indexer_urls: vec![IndexerUrl {
				type_: "rest".to_string(),
				url: SecretValue::Plain(SecretString::new(
					"https://indexer.test.network".to_string(),
				)),
				weight: 100,
			}],
			program_id: "zk_polls_test.aleo".to_string(),
			store_url: SecretValue::Plain(SecretString::new(
				"https://store.test.network".to_string(),
			)),
			aggressive_interval_ms: DEFAULT_AGGRESSIVE_INTERVAL_MS,
			normal_interval_ms: DEFAULT_NORMAL_INTERVAL_MS,
			page_limit: None,
		}
	}
}

impl NetworkBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn slug(mut self, slug: &str) -> Self {
		self.slug = slug.to_string();
		self
	}

	pub fn indexer_url(mut self, url: &str) -> Self {
		self.indexer_urls = vec![IndexerUrl {
			type_: "rest".to_string(),
			url: SecretValue::Plain(SecretString::new(url.to_string())),
			weight: 100,
		}];
		self
	}

	pub fn add_indexer_url(mut self, url: &str, type_: &str, weight: u32) -> Self {
		self.indexer_urls.push(IndexerUrl {
			type_: type_.to_string(),
			url: SecretValue::Plain(SecretString::new(url.to_string())),
			weight,
		});
		self
	}

	pub fn add_secret_indexer_url(mut self, url: SecretValue, type_: &str, weight: u32) -> Self {
		self.indexer_urls.push(IndexerUrl {
			type_: type_.to_string(),
			url,
			weight,
		});
		self
	}

	pub fn clear_indexer_urls(mut self) -> Self {
		self.indexer_urls.clear();
		self
	}

	pub fn program_id(mut self, program_id: &str) -> Self {
		self.program_id = program_id.to_string();
		self
	}

	pub fn store_url(mut self, url: &str) -> Self {
		self.store_url = SecretValue::Plain(SecretString::new(url.to_string()));
		self
	}

	pub fn secret_store_url(mut self, url: SecretValue) -> Self {
		self.store_url = url;
		self
	}

	pub fn aggressive_interval_ms(mut self, interval: u64) -> Self {
		self.aggressive_interval_ms = interval;
		self
	}

	pub fn normal_interval_ms(mut self, interval: u64) -> Self {
		self.normal_interval_ms = interval;
		self
	}

	pub fn page_limit(mut self, limit: u32) -> Self {
		self.page_limit = Some(limit);
		self
	}

	pub fn build(self) -> Network {
		Network {
			name: self.name,
			slug: self.slug,
			indexer_urls: self.indexer_urls,
			program_id: self.program_id,
			store_url: self.store_url,
			aggressive_interval_ms: self.aggressive_interval_ms,
			normal_interval_ms: self.normal_interval_ms,
			page_limit: self.page_limit,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_network() {
		let network = NetworkBuilder::new().build();

		assert_eq!(network.name, "Test Network");
		assert_eq!(network.slug, "test_network");
		assert_eq!(network.program_id, "zk_polls_test.aleo");
		assert_eq!(network.store_url.as_ref(), "https://store.test.network");
		assert_eq!(
			network.aggressive_interval_ms,
			DEFAULT_AGGRESSIVE_INTERVAL_MS
		);
		assert_eq!(network.normal_interval_ms, DEFAULT_NORMAL_INTERVAL_MS);
		assert_eq!(network.page_limit, None);

		// Check default indexer URL
		assert_eq!(network.indexer_urls.len(), 1);
		assert_eq!(
			network.indexer_urls[0].url.as_ref().to_string(),
			"https://indexer.test.network".to_string()
		);
		assert_eq!(network.indexer_urls[0].type_, "rest");
		assert_eq!(network.indexer_urls[0].weight, 100);
	}

	#[test]
	fn test_basic_builder_methods() {
		let network = NetworkBuilder::new()
			.name("Aleo Testnet")
			.slug("testnet")
			.program_id("zk_polls_v1.aleo")
			.store_url("https://api.zkpoll.example")
			.aggressive_interval_ms(2_000)
			.normal_interval_ms(30_000)
			.page_limit(25)
			.build();

		assert_eq!(network.name, "Aleo Testnet");
		assert_eq!(network.slug, "testnet");
		assert_eq!(network.program_id, "zk_polls_v1.aleo");
		assert_eq!(network.store_url.as_ref(), "https://api.zkpoll.example");
		assert_eq!(network.aggressive_interval_ms, 2_000);
		assert_eq!(network.normal_interval_ms, 30_000);
		assert_eq!(network.page_limit, Some(25));
	}

	#[test]
	fn test_indexer_url_methods() {
		let network = NetworkBuilder::new()
			.clear_indexer_urls()
			.add_indexer_url("https://indexer1.example.com", "rest", 80)
			.add_indexer_url("https://indexer2.example.com", "graphql", 20)
			.build();

		assert_eq!(network.indexer_urls.len(), 2);
		assert_eq!(
			network.indexer_urls[0].url.as_ref(),
			"https://indexer1.example.com"
		);
		assert_eq!(network.indexer_urls[0].weight, 80);
		assert_eq!(network.indexer_urls[1].type_, "graphql");
	}

	#[test]
	fn test_secret_url_methods() {
		let network = NetworkBuilder::new()
			.clear_indexer_urls()
			.add_secret_indexer_url(
				SecretValue::Environment("INDEXER_URL".to_string()),
				"rest",
				100,
			)
			.secret_store_url(SecretValue::Environment("STORE_URL".to_string()))
			.build();

		assert_eq!(
			network.indexer_urls[0].url,
			SecretValue::Environment("INDEXER_URL".to_string())
		);
		assert_eq!(
			network.store_url,
			SecretValue::Environment("STORE_URL".to_string())
		);
	}

	#[test]
	fn test_effective_page_limit_fallback() {
		let defaulted = NetworkBuilder::new().build();
		let configured = NetworkBuilder::new().page_limit(10).build();

		assert_eq!(
			defaulted.effective_page_limit(),
			crate::utils::DEFAULT_PAGE_LIMIT
		);
		assert_eq!(configured.effective_page_limit(), 10);
	}
}
