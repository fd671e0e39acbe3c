//! Notification client pool.
//!
//! Caches webhook HTTP clients keyed by their retry policy so watchers
//! that share a policy reuse the same connection pool.

use crate::utils::client_storage::ClientStorage;
use crate::utils::{create_retryable_http_client, RetryConfig, TransientErrorRetryStrategy};
use reqwest::Client as ReqwestClient;
use reqwest_middleware::ClientWithMiddleware;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationPoolError {
	#[error("Failed to create HTTP client: {0}")]
	HttpClientBuildError(String),
}

/// Notification client pool that manages HTTP clients for webhook delivery.
///
/// Provides a thread-safe way to access and create HTTP clients for
/// sending notifications. It uses a `ClientStorage` to hold the clients,
/// allowing for efficient reuse of connections across watchers.
pub struct NotificationClientPool {
	http_clients: ClientStorage<ClientWithMiddleware>,
}

impl NotificationClientPool {
	pub fn new() -> Self {
		Self {
			http_clients: ClientStorage::new(),
		}
	}

	/// Get or create an HTTP client with retry capabilities.
	///
	/// Clients are keyed by the retry policy, so two watchers with the same
	/// policy share one client.
	///
	/// # Arguments
	/// * `retry_policy` - Configuration for HTTP retry policy
	///
	/// # Returns
	/// * `Result<Arc<ClientWithMiddleware>, NotificationPoolError>` - The HTTP client
	///   wrapped in an `Arc` for shared ownership, or an error if client creation
	///   fails.
	pub async fn get_or_create_http_client(
		&self,
		retry_policy: &RetryConfig,
	) -> Result<Arc<ClientWithMiddleware>, NotificationPoolError> {
		let key = format!("{:?}", retry_policy);

		// Fast path (read lock)
		if let Some(client) = self.http_clients.clients.read().await.get(&key) {
			return Ok(client.clone());
		}

		// Slow path (write lock), re-checked in case another task won the race
		let mut clients = self.http_clients.clients.write().await;
		if let Some(client) = clients.get(&key) {
			return Ok(client.clone());
		}

		let base_client = ReqwestClient::builder()
			.pool_max_idle_per_host(10)
			.pool_idle_timeout(Some(Duration::from_secs(90)))
			.connect_timeout(Duration::from_secs(10))
			.build()
			.map_err(|e| NotificationPoolError::HttpClientBuildError(e.to_string()))?;

		let client = Arc::new(create_retryable_http_client(
			retry_policy,
			base_client,
			Some(TransientErrorRetryStrategy),
		));
		clients.insert(key, client.clone());

		Ok(client)
	}

	/// Get the number of active HTTP clients in the pool
	#[cfg(test)]
	pub async fn get_active_http_client_count(&self) -> usize {
		self.http_clients.clients.read().await.len()
	}
}

impl Default for NotificationClientPool {
	fn default() -> Self {
		Self::new()
	}
}
