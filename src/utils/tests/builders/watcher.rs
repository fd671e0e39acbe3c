//! Test helper utilities for Watcher configuration
//!
//! - `WatcherBuilder`: Builder for creating test Watcher instances

use crate::models::{
	NotificationMessage, SecretString, SecretValue, Watcher, WatcherNotifications,
};

/// Builder for creating test Watcher instances
pub struct WatcherBuilder {
	name: String,
	network: String,
	address: String,
	paused: bool,
	notifications: Option<WatcherNotifications>,
}

impl Default for WatcherBuilder {
	fn default() -> Self {
		Self {
			name: "test-watcher".to_string(),
			network: "test_network".to_string(),
			address: "aleo1qnr4dkkvkgfqph0vzc3y6z2eu975wnpz2925ntjccd5cfqxtyu8s7pyjh9"
				.to_string(),
			paused: false,
			notifications: None,
		}
	}
}

impl WatcherBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn network(mut self, network: &str) -> Self {
		self.network = network.to_string();
		self
	}

	pub fn address(mut self, address: &str) -> Self {
		self.address = address.to_string();
		self
	}

	pub fn paused(mut self, paused: bool) -> Self {
		self.paused = paused;
		self
	}

	/// Attaches a webhook notifications block with default message templates
	pub fn webhook(mut self, url: &str) -> Self {
		self.notifications = Some(WatcherNotifications {
			url: SecretValue::Plain(SecretString::new(url.to_string())),
			url_params: None,
			method: None,
			secret: None,
			headers: None,
			message: NotificationMessage {
				title: "Poll confirmed: ${title}".to_string(),
				body: "Poll ${title} is live as #${on_chain_id}".to_string(),
			},
			retry_policy: Default::default(),
		});
		self
	}

	/// Overrides the webhook message templates, no-op without a webhook
	pub fn webhook_message(mut self, title: &str, body: &str) -> Self {
		if let Some(notifications) = &mut self.notifications {
			notifications.message = NotificationMessage {
				title: title.to_string(),
				body: body.to_string(),
			};
		}
		self
	}

	/// Sets the webhook HTTP method, no-op without a webhook
	pub fn webhook_method(mut self, method: &str) -> Self {
		if let Some(notifications) = &mut self.notifications {
			notifications.method = Some(method.to_string());
		}
		self
	}

	/// Sets the webhook signing secret, no-op without a webhook
	pub fn webhook_secret(mut self, secret: &str) -> Self {
		if let Some(notifications) = &mut self.notifications {
			notifications.secret = Some(SecretValue::Plain(SecretString::new(secret.to_string())));
		}
		self
	}

	pub fn build(self) -> Watcher {
		Watcher {
			name: self.name,
			network: self.network,
			address: self.address,
			paused: self.paused,
			notifications: self.notifications,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_watcher() {
		let watcher = WatcherBuilder::new().build();

		assert_eq!(watcher.name, "test-watcher");
		assert_eq!(watcher.network, "test_network");
		assert_eq!(
			watcher.address,
			"aleo1qnr4dkkvkgfqph0vzc3y6z2eu975wnpz2925ntjccd5cfqxtyu8s7pyjh9"
		);
		assert!(!watcher.paused);
		assert!(watcher.notifications.is_none());
	}

	#[test]
	fn test_basic_builder_methods() {
		let watcher = WatcherBuilder::new()
			.name("mainnet-alice")
			.network("mainnet")
			.address("aleo1alice")
			.paused(true)
			.build();

		assert_eq!(watcher.name, "mainnet-alice");
		assert_eq!(watcher.network, "mainnet");
		assert_eq!(watcher.address, "aleo1alice");
		assert!(watcher.paused);
	}

	#[test]
	fn test_webhook_methods() {
		let watcher = WatcherBuilder::new()
			.webhook("https://hooks.example.com/polls")
			.webhook_method("PUT")
			.webhook_secret("signing-key")
			.webhook_message("Confirmed", "Poll ${title} confirmed")
			.build();

		let notifications = watcher.notifications.unwrap();
		assert_eq!(notifications.url.as_ref(), "https://hooks.example.com/polls");
		assert_eq!(notifications.method, Some("PUT".to_string()));
		assert_eq!(
			notifications.secret.as_ref().map(|s| s.as_ref().to_string()),
			Some("signing-key".to_string())
		);
		assert_eq!(notifications.message.title, "Confirmed");
		assert_eq!(notifications.message.body, "Poll ${title} confirmed");
	}

	#[test]
	fn test_webhook_setters_without_webhook_are_noops() {
		let watcher = WatcherBuilder::new()
			.webhook_method("PUT")
			.webhook_secret("signing-key")
			.build();

		assert!(watcher.notifications.is_none());
	}
}
