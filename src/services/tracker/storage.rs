//! Durable store client for pending submissions.
//!
//! Talks to the pending-poll HTTP API that survives process restarts and is
//! shared between sessions. Every endpoint answers with the envelope
//! `{success, data?, error?}` and camelCase field names.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::{
	models::{Network, NewSubmission, PendingSubmission, PrivacyMode, Visibility},
	services::tracker::error::TrackerError,
	utils::http::{create_retryable_http_client, RetryConfig, TransientErrorRetryStrategy},
};

/// Response envelope shared by every store endpoint
#[derive(Debug, Clone, Deserialize)]
struct ApiResponse<T> {
	success: bool,
	data: Option<T>,
	error: Option<String>,
}

/// Body of `POST /api/polls/pending`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePendingRequest<'a> {
	wallet_address: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	tx_hash: Option<&'a str>,
	title: &'a str,
	description: &'a str,
	options: &'a [String],
	reward_per_vote: Decimal,
	max_voters: u32,
	duration_blocks: u64,
	fund_amount: Decimal,
	token_id: &'a str,
	privacy_mode: &'a PrivacyMode,
	visibility: &'a Visibility,
	network: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	expires_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/polls/pending/:id/confirm`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest {
	on_chain_id: u64,
}

/// Body of `PUT /api/polls/pending/:id/fail`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailRequest<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	error_message: Option<&'a str>,
}

/// Body of `DELETE /api/polls/pending/:id`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct DismissRequest<'a> {
	wallet_address: &'a str,
}

/// Defines the core interface for the durable pending-submission store
///
/// This trait must be implemented by all store integrations. Listing and
/// creation fail loudly; the transition endpoints report the store's own
/// success flag, so a refusal (already resolved, unknown id, wrong owner)
/// is `Ok(false)` rather than an error.
#[async_trait]
pub trait PendingStore: Send + Sync {
	/// Lists the unresolved submissions recorded for a wallet on a network
	async fn list_pending(
		&self,
		address: &str,
		network: &str,
	) -> Result<Vec<PendingSubmission>, TrackerError>;

	/// Durably records a new submission and returns the created record
	async fn create_pending(
		&self,
		submission: &NewSubmission,
		wallet_address: &str,
	) -> Result<PendingSubmission, TrackerError>;

	/// Marks a submission confirmed with its on-chain id
	async fn confirm_pending(&self, id: &str, on_chain_id: u64) -> Result<bool, TrackerError>;

	/// Marks a submission failed, optionally with a message
	async fn fail_pending(
		&self,
		id: &str,
		error_message: Option<String>,
	) -> Result<bool, TrackerError>;

	/// Deletes a submission on behalf of its owner
	async fn delete_pending(&self, id: &str, wallet_address: &str) -> Result<bool, TrackerError>;
}

/// HTTP client for the durable store API
///
/// The client is thread-safe and can be shared across multiple tasks.
#[derive(Clone, Debug)]
pub struct HttpPendingStore {
	/// Retryable HTTP client for making requests
	client: ClientWithMiddleware,
	/// Store base URL without a trailing slash
	base_url: String,
}

impl HttpPendingStore {
	/// Creates a new store client for a network
	///
	/// # Arguments
	///
	/// * `network` - Network configuration carrying the store base URL
	///
	/// # Returns
	///
	/// * `Result<Self, TrackerError>` - New client instance or a
	///   configuration error
	pub fn new(network: &Network) -> Result<Self, TrackerError> {
		Self::from_url(network.store_url.as_ref())
	}

	/// Creates a new store client over an explicit base URL
	pub fn from_url(base_url: &str) -> Result<Self, TrackerError> {
		let url = Url::parse(base_url).map_err(|e| {
			TrackerError::store_error(
				format!("Invalid store URL {}", base_url),
				Some(Box::new(e)),
				None,
			)
		})?;

		let base_client = reqwest::ClientBuilder::new()
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.map_err(|e| {
				TrackerError::store_error(
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
			base_url: url.as_str().trim_end_matches('/').to_string(),
		})
	}

	/// Parses a data-carrying envelope, treating refusals as errors
	async fn data_result<T: DeserializeOwned>(
		response: reqwest::Response,
		operation: &str,
	) -> Result<T, TrackerError> {
		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(TrackerError::store_error(
				format!("Store request {} failed with status {}", operation, status),
				None,
				Some(HashMap::from([
					("status".to_string(), status.to_string()),
					("body".to_string(), body),
				])),
			));
		}

		let envelope = response.json::<ApiResponse<T>>().await.map_err(|e| {
			TrackerError::store_error(
				format!("Failed to parse store response for {}", operation),
				Some(Box::new(e)),
				None,
			)
		})?;

		if !envelope.success {
			return Err(TrackerError::store_error(
				format!(
					"Store refused {}: {}",
					operation,
					envelope.error.as_deref().unwrap_or("no error detail")
				),
				None,
				None,
			));
		}

		envelope.data.ok_or_else(|| {
			TrackerError::store_error(
				format!("Store response for {} carried no data", operation),
				None,
				None,
			)
		})
	}

	/// Parses a flag envelope; a refusal is a `false` flag, not an error
	async fn flag_result(response: reqwest::Response, operation: &str) -> Result<bool, TrackerError> {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();

		if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
			if !envelope.success {
				tracing::debug!(
					"Store refused {}: {}",
					operation,
					envelope.error.as_deref().unwrap_or("no error detail")
				);
			}
			return Ok(envelope.success);
		}

		Err(TrackerError::store_error(
			format!("Store request {} failed with status {}", operation, status),
			None,
			Some(HashMap::from([
				("status".to_string(), status.to_string()),
				("body".to_string(), body),
			])),
		))
	}

	fn send_error(operation: &str, e: reqwest_middleware::Error) -> TrackerError {
		TrackerError::store_error(
			format!("Store request {} failed", operation),
			Some(Box::new(e)),
			None,
		)
	}
}

#[async_trait]
impl PendingStore for HttpPendingStore {
	async fn list_pending(
		&self,
		address: &str,
		network: &str,
	) -> Result<Vec<PendingSubmission>, TrackerError> {
		let endpoint = format!(
			"{}/api/polls/pending/{}?network={}",
			self.base_url, address, network
		);

		let response = self
			.client
			.get(&endpoint)
			.send()
			.await
			.map_err(|e| Self::send_error("list", e))?;

		Self::data_result::<Vec<PendingSubmission>>(response, "list").await
	}

	async fn create_pending(
		&self,
		submission: &NewSubmission,
		wallet_address: &str,
	) -> Result<PendingSubmission, TrackerError> {
		let endpoint = format!("{}/api/polls/pending", self.base_url);
		let request = CreatePendingRequest {
			wallet_address,
			tx_hash: submission.tx_hash.as_deref(),
			title: &submission.title,
			description: &submission.description,
			options: &submission.options,
			reward_per_vote: submission.reward_per_vote,
			max_voters: submission.max_voters,
			duration_blocks: submission.duration_blocks,
			fund_amount: submission.fund_amount,
			token_id: &submission.token_id,
			privacy_mode: &submission.privacy_mode,
			visibility: &submission.visibility,
			network: &submission.network,
			expires_at: submission.expires_at,
		};

		let response = self
			.client
			.post(&endpoint)
			.json(&request)
			.send()
			.await
			.map_err(|e| Self::send_error("create", e))?;

		Self::data_result::<PendingSubmission>(response, "create").await
	}

	async fn confirm_pending(&self, id: &str, on_chain_id: u64) -> Result<bool, TrackerError> {
		let endpoint = format!("{}/api/polls/pending/{}/confirm", self.base_url, id);

		let response = self
			.client
			.put(&endpoint)
			.json(&ConfirmRequest { on_chain_id })
			.send()
			.await
			.map_err(|e| Self::send_error("confirm", e))?;

		Self::flag_result(response, "confirm").await
	}

	async fn fail_pending(
		&self,
		id: &str,
		error_message: Option<String>,
	) -> Result<bool, TrackerError> {
		let endpoint = format!("{}/api/polls/pending/{}/fail", self.base_url, id);

		let response = self
			.client
			.put(&endpoint)
			.json(&FailRequest {
				error_message: error_message.as_deref(),
			})
			.send()
			.await
			.map_err(|e| Self::send_error("fail", e))?;

		Self::flag_result(response, "fail").await
	}

	async fn delete_pending(&self, id: &str, wallet_address: &str) -> Result<bool, TrackerError> {
		let endpoint = format!("{}/api/polls/pending/{}", self.base_url, id);

		let response = self
			.client
			.delete(&endpoint)
			.json(&DismissRequest { wallet_address })
			.send()
			.await
			.map_err(|e| Self::send_error("dismiss", e))?;

		Self::flag_result(response, "dismiss").await
	}
}
