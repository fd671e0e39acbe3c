use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{models::SecretValue, utils::RetryConfig};

/// Configuration for one reconciliation loop: which wallet address to keep
/// in sync with which network, and where to announce confirmations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Watcher {
	/// Unique name identifying this watcher
	pub name: String,

	/// Slug of the network configuration this watcher runs against
	pub network: String,

	/// Wallet address whose pending submissions are reconciled
	pub address: String,

	/// Whether the watcher is loaded but not scheduled
	#[serde(default)]
	pub paused: bool,

	/// Webhook to call when a submission confirms; absent means log only
	pub notifications: Option<WatcherNotifications>,
}

/// Webhook notification settings for a watcher
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WatcherNotifications {
	/// Webhook endpoint URL
	pub url: SecretValue,

	/// Query parameters appended to the URL
	#[serde(default)]
	pub url_params: Option<HashMap<String, String>>,

	/// HTTP method to use, POST when absent
	pub method: Option<String>,

	/// Secret used to sign payloads
	pub secret: Option<SecretValue>,

	/// Optional HTTP headers
	pub headers: Option<HashMap<String, String>>,

	/// Notification message templates
	pub message: NotificationMessage,

	/// Retry policy for webhook requests
	#[serde(default)]
	pub retry_policy: RetryConfig,
}

/// Notification message fields
///
/// Both fields accept `${variable}` placeholders resolved against the
/// confirmed submission (e.g. `${title}`, `${on_chain_id}`, `${address}`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotificationMessage {
	/// Notification title or subject
	pub title: String,
	/// Message template
	pub body: String,
}
