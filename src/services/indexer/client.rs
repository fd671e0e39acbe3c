//! HTTP client for the indexer REST API.
//!
//! Serves read-only queries against on-chain program mappings:
//! - Single mapping value lookups by key
//! - Paged mapping listings
//! - Chain head height
//!
//! Multiple endpoints per network are supported; requests walk the
//! configured URLs in descending weight order until one answers.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::{
	models::Network,
	services::indexer::error::IndexerError,
	utils::http::{create_retryable_http_client, RetryConfig, TransientErrorRetryStrategy},
};

/// A single key/value pair returned when listing a mapping
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MappingEntry {
	/// Mapping key, as encoded on chain
	pub key: String,

	/// Raw mapping value text
	pub value: String,
}

/// Defines the core interface for indexer clients
///
/// This trait must be implemented by all indexer integrations to provide
/// standardized access to on-chain mapping state. Absent data is `None` or
/// an empty listing, never an error; errors are reserved for transport and
/// protocol failures.
#[async_trait]
pub trait IndexerClient: Send + Sync {
	/// Retrieves a single mapping value by key
	///
	/// # Arguments
	///
	/// * `program_id` - The program the mapping belongs to
	/// * `mapping` - The mapping name
	/// * `key` - The mapping key, as encoded on chain
	///
	/// # Returns
	///
	/// * `Result<Option<String>, IndexerError>` - The raw value text, or
	///   `None` when the key does not exist
	async fn get_mapping_value(
		&self,
		program_id: &str,
		mapping: &str,
		key: &str,
	) -> Result<Option<String>, IndexerError>;

	/// Retrieves a page of mapping entries
	///
	/// # Arguments
	///
	/// * `program_id` - The program the mapping belongs to
	/// * `mapping` - The mapping name
	/// * `page` - Zero-based page index
	/// * `limit` - Maximum number of entries per page
	///
	/// # Returns
	///
	/// * `Result<Vec<MappingEntry>, IndexerError>` - The listed entries, empty
	///   when the mapping does not exist or the page is out of range
	async fn get_mapping_values(
		&self,
		program_id: &str,
		mapping: &str,
		page: u32,
		limit: u32,
	) -> Result<Vec<MappingEntry>, IndexerError>;

	/// Retrieves the latest block height known to the indexer
	///
	/// # Returns
	///
	/// * `Result<Option<u64>, IndexerError>` - The chain head height, or
	///   `None` when the indexer has no height yet
	async fn get_block_height(&self) -> Result<Option<u64>, IndexerError>;
}

/// REST indexer client with weighted endpoint failover
///
/// Endpoints come from the network configuration; only `rest` entries with a
/// positive weight participate. Each request is attempted against the
/// endpoints in descending weight order, moving on after connectivity
/// failures, rate limiting and server errors. HTTP 404 is data absence, not
/// a failure.
///
/// The client is thread-safe and can be shared across multiple tasks.
#[derive(Clone, Debug)]
pub struct HttpIndexerClient {
	/// Retryable HTTP client for making requests
	client: ClientWithMiddleware,
	/// Indexer base URLs in descending weight order
	urls: Vec<String>,
}

impl HttpIndexerClient {
	/// Creates a new indexer client for a network
	///
	/// # Arguments
	///
	/// * `network` - Network configuration containing indexer URLs and weights
	///
	/// # Returns
	///
	/// * `Result<Self, IndexerError>` - New client instance, or an error when
	///   the network has no usable endpoints
	pub fn new(network: &Network) -> Result<Self, IndexerError> {
		let mut indexer_urls: Vec<_> = network
			.indexer_urls
			.iter()
			.filter(|indexer_url| indexer_url.type_ == "rest" && indexer_url.weight > 0)
			.collect();

		indexer_urls.sort_by(|a, b| b.weight.cmp(&a.weight));

		let mut urls = Vec::with_capacity(indexer_urls.len());
		for indexer_url in indexer_urls {
			let url = match Url::parse(indexer_url.url.as_ref()) {
				Ok(url) => url,
				Err(_) => continue,
			};
			urls.push(url.as_str().trim_end_matches('/').to_string());
		}

		if urls.is_empty() {
			return Err(IndexerError::connection_error(
				format!("No usable indexer endpoints for network {}", network.slug),
				None,
				Some(HashMap::from([(
					"network".to_string(),
					network.slug.clone(),
				)])),
			));
		}

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.map_err(|e| {
				IndexerError::connection_error(
					"Failed to create base HTTP client",
					Some(Box::new(e)),
					None,
				)
			})?;

		let client = create_retryable_http_client(
			&RetryConfig::default(),
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self { client, urls })
	}

	/// Builds a client over explicit base URLs, bypassing network config
	///
	/// # Arguments
	///
	/// * `urls` - Indexer base URLs in the order they should be tried
	pub fn with_urls(urls: Vec<String>) -> Result<Self, IndexerError> {
		if urls.is_empty() {
			return Err(IndexerError::connection_error(
				"No indexer endpoints supplied",
				None,
				None,
			));
		}

		let base_client = reqwest::ClientBuilder::new()
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.map_err(|e| {
				IndexerError::connection_error(
					"Failed to create base HTTP client",
					Some(Box::new(e)),
					None,
				)
			})?;

		let client = create_retryable_http_client(
			&RetryConfig::default(),
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self {
			client,
			urls: urls
				.into_iter()
				.map(|url| url.trim_end_matches('/').to_string())
				.collect(),
		})
	}

	/// Sends a GET request to the first endpoint that answers
	///
	/// Walks the endpoint list in order. Connectivity failures, rate limiting
	/// and server errors move on to the next endpoint; a 404 resolves to
	/// `Ok(None)` immediately; any other client error fails the query.
	async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, IndexerError> {
		for url in &self.urls {
			let endpoint = format!("{}{}", url, path);

			let response = match self.client.get(&endpoint).send().await {
				Ok(response) => response,
				Err(e) => {
					tracing::warn!("Network error while querying indexer {}: {}", endpoint, e);
					continue;
				}
			};

			let status = response.status();
			if status == reqwest::StatusCode::NOT_FOUND {
				return Ok(None);
			}

			if status.is_success() {
				return response.json::<T>().await.map(Some).map_err(|e| {
					IndexerError::response_parse_error(
						format!("Failed to parse indexer response from {}", endpoint),
						Some(Box::new(e)),
						None,
					)
				});
			}

			let error_body = response.text().await.unwrap_or_default();
			if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
				tracing::warn!(
					"Indexer {} responded with status {}: {}",
					endpoint,
					status,
					error_body
				);
				continue;
			}

			return Err(IndexerError::request_error(
				format!(
					"Indexer request to {} failed with status {}",
					endpoint, status
				),
				None,
				Some(HashMap::from([
					("status".to_string(), status.to_string()),
					("body".to_string(), error_body),
				])),
			));
		}

		Err(IndexerError::connection_error(
			format!("All indexer endpoints failed for {}", path),
			None,
			None,
		))
	}
}

#[async_trait]
impl IndexerClient for HttpIndexerClient {
	async fn get_mapping_value(
		&self,
		program_id: &str,
		mapping: &str,
		key: &str,
	) -> Result<Option<String>, IndexerError> {
		let path = format!("/program/{}/mapping/{}/{}", program_id, mapping, key);
		Ok(self.get_json::<Option<String>>(&path).await?.flatten())
	}

	async fn get_mapping_values(
		&self,
		program_id: &str,
		mapping: &str,
		page: u32,
		limit: u32,
	) -> Result<Vec<MappingEntry>, IndexerError> {
		let path = format!(
			"/program/{}/mapping/{}?page={}&limit={}",
			program_id, mapping, page, limit
		);
		Ok(self
			.get_json::<Vec<MappingEntry>>(&path)
			.await?
			.unwrap_or_default())
	}

	async fn get_block_height(&self) -> Result<Option<u64>, IndexerError> {
		Ok(self
			.get_json::<Option<u64>>("/block/height/latest")
			.await?
			.flatten())
	}
}
