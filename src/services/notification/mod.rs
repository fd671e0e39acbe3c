//! Notification service implementation.
//!
//! This module provides functionality to announce confirmed submissions
//! through webhooks. Supports variable substitution in message templates.

use async_trait::async_trait;

use std::{collections::HashMap, sync::Arc};

mod error;
mod pool;
mod template;
mod webhook;

use crate::models::Watcher;

pub use error::NotificationError;
pub use pool::NotificationClientPool;
pub use template::format_template;
pub use webhook::{WebhookConfig, WebhookNotifier};

/// A channel that can announce a confirmed submission
///
/// Implementations own their message templates and resolve `${variable}`
/// placeholders against the supplied variables.
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Delivers a notification built from the submission variables
	///
	/// # Arguments
	/// * `variables` - Variables captured from the confirmed submission
	///
	/// # Returns
	/// * `Result<(), NotificationError>` - Success or error
	async fn notify(&self, variables: &HashMap<String, String>) -> Result<(), NotificationError>;
}

/// Service for building per-watcher notifiers over pooled HTTP clients
pub struct NotificationService {
	/// Client pool for webhook HTTP clients
	client_pool: Arc<NotificationClientPool>,
}

impl NotificationService {
	/// Creates a new notification service instance
	pub fn new() -> Self {
		NotificationService {
			client_pool: Arc::new(NotificationClientPool::new()),
		}
	}

	/// Builds the notifier for a watcher, if it has one configured
	///
	/// Watchers without a notifications block reconcile silently, so this
	/// returns `Ok(None)` for them rather than an error.
	///
	/// # Arguments
	/// * `watcher` - Watcher whose notification settings to use
	///
	/// # Returns
	/// * `Result<Option<Arc<dyn Notifier>>, NotificationError>` - The configured
	///   notifier, or `None` when the watcher has no notifications block
	pub async fn notifier_for(
		&self,
		watcher: &Watcher,
	) -> Result<Option<Arc<dyn Notifier>>, NotificationError> {
		let Some(config) = &watcher.notifications else {
			return Ok(None);
		};

		// Get or create the HTTP client from the pool based on the retry policy
		let http_client = self
			.client_pool
			.get_or_create_http_client(&config.retry_policy)
			.await
			.map_err(|e| {
				NotificationError::execution_error(
					"Failed to get or create HTTP client from pool".to_string(),
					Some(e.into()),
					None,
				)
			})?;

		let notifier = WebhookNotifier::from_watcher(config, http_client)?;
		Ok(Some(Arc::new(notifier)))
	}
}

impl Default for NotificationService {
	fn default() -> Self {
		Self::new()
	}
}
