//! Webhook notification implementation.
//!
//! Provides functionality to send formatted messages to webhook endpoints
//! when a submission confirms, supporting message templates with variable
//! substitution and optional HMAC payload signing.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue},
	Method,
};
use reqwest_middleware::ClientWithMiddleware;
use sha2::Sha256;
use std::{collections::HashMap, sync::Arc};

use crate::{
	models::WatcherNotifications,
	services::notification::{format_template, NotificationError, Notifier},
};

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Represents a webhook configuration
#[derive(Clone)]
pub struct WebhookConfig {
	pub url: String,
	pub url_params: Option<HashMap<String, String>>,
	pub title: String,
	pub body_template: String,
	pub method: Option<String>,
	pub secret: Option<String>,
	pub headers: Option<HashMap<String, String>>,
}

/// Implementation of confirmation notifications via webhooks
#[derive(Debug)]
pub struct WebhookNotifier {
	/// Webhook URL for message delivery
	pub url: String,
	/// URL parameters to use for the webhook request
	pub url_params: Option<HashMap<String, String>>,
	/// Title template to display in the message
	pub title: String,
	/// Body template resolved against submission variables
	pub body_template: String,
	/// Configured HTTP client for webhook requests with retry capabilities
	pub client: Arc<ClientWithMiddleware>,
	/// HTTP method to use for the webhook request
	pub method: Option<String>,
	/// Secret to use for signing the webhook request
	pub secret: Option<String>,
	/// Headers to use for the webhook request
	pub headers: Option<HashMap<String, String>>,
}

impl WebhookNotifier {
	/// Creates a new Webhook notifier instance
	///
	/// # Arguments
	/// * `config` - Webhook configuration
	/// * `http_client` - HTTP client with middleware for retries
	///
	/// # Returns
	/// * `Result<Self, NotificationError>` - Notifier instance if config is valid
	pub fn new(
		config: WebhookConfig,
		http_client: Arc<ClientWithMiddleware>,
	) -> Result<Self, NotificationError> {
		let mut headers = config.headers.unwrap_or_default();
		if !headers.contains_key("Content-Type") {
			headers.insert("Content-Type".to_string(), "application/json".to_string());
		}
		Ok(Self {
			url: config.url,
			url_params: config.url_params,
			title: config.title,
			body_template: config.body_template,
			client: http_client,
			method: Some(config.method.unwrap_or("POST".to_string())),
			secret: config.secret,
			headers: Some(headers),
		})
	}

	/// Creates a Webhook notifier from a watcher's notification settings
	///
	/// # Arguments
	/// * `config` - Notification settings from the watcher configuration
	/// * `http_client` - HTTP client with middleware for retries
	///
	/// # Returns
	/// * `Result<Self, NotificationError>` - Notifier instance if the settings are valid
	pub fn from_watcher(
		config: &WatcherNotifications,
		http_client: Arc<ClientWithMiddleware>,
	) -> Result<Self, NotificationError> {
		if config.url.is_empty() {
			return Err(NotificationError::config_error(
				"Invalid webhook configuration: empty URL".to_string(),
				None,
				None,
			));
		}

		let webhook_config = WebhookConfig {
			url: config.url.as_ref().to_string(),
			url_params: config.url_params.clone(),
			title: config.message.title.clone(),
			body_template: config.message.body.clone(),
			method: config.method.clone(),
			secret: config.secret.as_ref().map(|s| s.as_ref().to_string()),
			headers: config.headers.clone(),
		};

		WebhookNotifier::new(webhook_config, http_client)
	}

	pub fn sign_payload(
		&self,
		secret: &str,
		payload: &serde_json::Value,
	) -> Result<(String, String), NotificationError> {
		// Explicitly reject empty secret, because `HmacSha256::new_from_slice` currently allows empty secrets
		if secret.is_empty() {
			return Err(NotificationError::notify_failed(
				"Invalid secret: cannot be empty.".to_string(),
				None,
				None,
			));
		}

		let timestamp = Utc::now().timestamp_millis();

		// Create HMAC instance
		let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
			NotificationError::config_error(format!("Invalid secret: {}", e), None, None)
		})?; // Handle error if secret is invalid

		// Create the message to sign
		let serialized_payload = serde_json::to_string(payload).map_err(|e| {
			NotificationError::internal_error(
				format!("Failed to serialize payload: {}", e),
				Some(e.into()),
				None,
			)
		})?;
		let message = format!("{}{}", serialized_payload, timestamp);
		mac.update(message.as_bytes());

		// Get the HMAC result
		let signature = hex::encode(mac.finalize().into_bytes());

		Ok((signature, timestamp.to_string()))
	}

	/// Sends a JSON payload to the webhook endpoint
	///
	/// # Arguments
	/// * `payload` - The JSON payload to send
	///
	/// # Returns
	/// * `Result<(), NotificationError>` - Success or error
	pub async fn notify_json(&self, payload: &serde_json::Value) -> Result<(), NotificationError> {
		let mut url = self.url.clone();
		// Add URL parameters if present
		if let Some(params) = &self.url_params {
			let params_str: Vec<String> = params
				.iter()
				.map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
				.collect();
			if !params_str.is_empty() {
				url = format!("{}?{}", url, params_str.join("&"));
			}
		}

		let method = if let Some(ref m) = self.method {
			Method::from_bytes(m.as_bytes()).unwrap_or(Method::POST)
		} else {
			Method::POST
		};

		// Add default headers
		let mut headers = HeaderMap::new();
		headers.insert(
			HeaderName::from_static("content-type"),
			HeaderValue::from_static("application/json"),
		);

		if let Some(secret) = &self.secret {
			let (signature, timestamp) = self.sign_payload(secret, payload).map_err(|e| {
				NotificationError::internal_error(e.to_string(), Some(e.into()), None)
			})?;

			// Add signature headers
			headers.insert(
				HeaderName::from_static("x-signature"),
				HeaderValue::from_str(&signature).map_err(|e| {
					NotificationError::notify_failed(
						"Invalid signature value".to_string(),
						Some(e.into()),
						None,
					)
				})?,
			);
			headers.insert(
				HeaderName::from_static("x-timestamp"),
				HeaderValue::from_str(&timestamp).map_err(|e| {
					NotificationError::notify_failed(
						"Invalid timestamp value".to_string(),
						Some(e.into()),
						None,
					)
				})?,
			);
		}

		// Add custom headers
		if let Some(headers_map) = &self.headers {
			for (key, value) in headers_map {
				let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
					NotificationError::notify_failed(
						format!("Invalid header name: {}", key),
						Some(e.into()),
						None,
					)
				})?;
				let header_value = HeaderValue::from_str(value).map_err(|e| {
					NotificationError::notify_failed(
						format!("Invalid header value for {}: {}", key, value),
						Some(e.into()),
						None,
					)
				})?;
				headers.insert(header_name, header_value);
			}
		}

		// Send request with custom payload
		let response = self
			.client
			.request(method, url.as_str())
			.headers(headers)
			.json(payload)
			.send()
			.await
			.map_err(|e| {
				NotificationError::notify_failed(
					format!("Failed to send webhook request: {}", e),
					Some(e.into()),
					None,
				)
			})?;

		let status = response.status();

		if !status.is_success() {
			return Err(NotificationError::notify_failed(
				format!("Webhook request failed with status: {}", status),
				None,
				None,
			));
		}

		Ok(())
	}
}

#[async_trait]
impl Notifier for WebhookNotifier {
	/// Resolves both message templates against the submission variables and
	/// delivers the resulting payload.
	///
	/// # Arguments
	/// * `variables` - Variables captured from the confirmed submission
	///
	/// # Returns
	/// * `Result<(), NotificationError>` - Success or error
	async fn notify(&self, variables: &HashMap<String, String>) -> Result<(), NotificationError> {
		let payload = serde_json::json!({
			"title": format_template(&self.title, variables),
			"body": format_template(&self.body_template, variables),
		});
		self.notify_json(&payload).await
	}
}
