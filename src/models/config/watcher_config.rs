//! Watcher configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for Watcher configurations,
//! allowing watchers to be loaded from JSON files.

use async_trait::async_trait;
use std::{collections::HashMap, fs, path::Path};

use crate::{
	models::{config::error::ConfigError, ConfigLoader, SecretValue, Watcher},
	utils::normalize_string,
};

#[async_trait]
impl ConfigLoader for Watcher {
	/// Resolve all secrets in the watcher configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		let mut watcher = self.clone();

		if let Some(notifications) = &mut watcher.notifications {
			let resolved_url = notifications.url.resolve().await.map_err(|e| {
				ConfigError::parse_error(
					format!("failed to resolve webhook URL: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;
			notifications.url = SecretValue::Plain(resolved_url);

			if let Some(secret) = &mut notifications.secret {
				let resolved_secret = secret.resolve().await.map_err(|e| {
					ConfigError::parse_error(
						format!("failed to resolve webhook secret: {}", e),
						Some(Box::new(e)),
						None,
					)
				})?;
				*secret = SecretValue::Plain(resolved_secret);
			}
		}

		Ok(watcher)
	}

	/// Load all watcher configurations from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or default
	/// config directory) as watcher configurations.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let watcher_dir = path.unwrap_or(Path::new("config/watchers"));
		let mut pairs = Vec::new();

		if !watcher_dir.exists() {
			return Err(ConfigError::file_error(
				"watchers directory not found",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					watcher_dir.display().to_string(),
				)])),
			));
		}

		for entry in fs::read_dir(watcher_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read watchers directory: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					watcher_dir.display().to_string(),
				)])),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						watcher_dir.display().to_string(),
					)])),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let watcher = Self::load_from_path(&path).await?;

			let existing_watchers: Vec<&Watcher> =
				pairs.iter().map(|(_, watcher)| watcher).collect();
			// Check watcher name uniqueness before pushing
			Self::validate_uniqueness(&existing_watchers, &watcher, &path.display().to_string())?;

			pairs.push((name, watcher));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a watcher configuration from a specific file
	///
	/// Reads and parses a single JSON file as a watcher configuration.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open watcher config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;
		let mut config: Watcher = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse watcher config: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		// Resolve secrets before validating
		config = config.resolve_secrets().await?;

		// Validate the config after loading
		config.validate().map_err(|e| {
			ConfigError::validation_error(
				format!("watcher validation failed: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([
					("path".to_string(), path.display().to_string()),
					("watcher_name".to_string(), config.name.clone()),
				])),
			)
		})?;

		Ok(config)
	}

	/// Validate the watcher configuration
	///
	/// Ensures that:
	/// - The watcher has a valid name and references a network
	/// - The wallet address is a well formed Aleo address
	/// - Webhook notification settings, when present, are usable
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate watcher name
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Watcher name is required",
				None,
				None,
			));
		}

		// Validate network reference
		if self.network.is_empty() {
			return Err(ConfigError::validation_error(
				"A network must be specified",
				None,
				None,
			));
		}

		// Validate wallet address format
		match regex::Regex::new(r"^aleo1[a-z0-9]{58}$") {
			Ok(re) => {
				if !re.is_match(&self.address) {
					return Err(ConfigError::validation_error(
						format!("Invalid wallet address format: {}", self.address),
						None,
						None,
					));
				}
			}
			Err(e) => {
				return Err(ConfigError::validation_error(
					format!("Failed to validate wallet address format: {}", e),
					None,
					None,
				));
			}
		}

		// Validate notification settings
		if let Some(notifications) = &self.notifications {
			// Validate URL format
			if !notifications.url.starts_with("http://")
				&& !notifications.url.starts_with("https://")
			{
				return Err(ConfigError::validation_error(
					"Invalid webhook URL format",
					None,
					None,
				));
			}
			// Validate HTTP method
			if let Some(method) = &notifications.method {
				match method.to_uppercase().as_str() {
					"GET" | "POST" | "PUT" | "DELETE" => {}
					_ => {
						return Err(ConfigError::validation_error(
							"Invalid HTTP method",
							None,
							None,
						));
					}
				}
			}
			// Validate message
			if notifications.message.title.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"Title cannot be empty",
					None,
					None,
				));
			}
			if notifications.message.body.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"Body cannot be empty",
					None,
					None,
				));
			}
		}

		// Log a warning if the watcher uses an insecure protocol
		self.validate_protocol();

		Ok(())
	}

	/// Validate the safety of the protocols used in the watcher
	///
	/// Returns if safe, or logs a warning message if unsafe.
	fn validate_protocol(&self) {
		if let Some(notifications) = &self.notifications {
			if notifications.url.starts_with("http://") {
				tracing::warn!(
					"Watcher '{}' uses an insecure webhook URL: {}",
					self.name,
					notifications.url.as_str()
				);
			}
			if notifications.secret.is_none() {
				tracing::warn!(
					"Watcher '{}' webhook has no signing secret configured",
					self.name
				);
			}
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		// Check watcher name uniqueness before pushing
		if instances.iter().any(|existing_watcher| {
			normalize_string(&existing_watcher.name) == normalize_string(&current_instance.name)
		}) {
			Err(ConfigError::validation_error(
				format!("Duplicate watcher name found: '{}'", current_instance.name),
				None,
				Some(HashMap::from([
					(
						"watcher_name".to_string(),
						current_instance.name.to_string(),
					),
					("path".to_string(), file_path.to_string()),
				])),
			))
		} else {
			Ok(())
		}
	}
}
