//! Network configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for Network configurations,
//! allowing network definitions to be loaded from JSON files.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};

use crate::{
	models::{config::error::ConfigError, ConfigLoader, Network, SecretValue},
	utils::normalize_string,
};

impl Network {
	/// Returns the tick interval in milliseconds for the given cadence.
	///
	/// The reconciler alternates between two cadences: the aggressive one while
	/// unresolved submissions exist and the normal one once the queue drains.
	pub fn interval_for(&self, aggressive: bool) -> u64 {
		if aggressive {
			self.aggressive_interval_ms
		} else {
			self.normal_interval_ms
		}
	}
}

#[async_trait]
impl ConfigLoader for Network {
	/// Resolve all secrets in the network configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut network = self.clone();

		for indexer_url in &mut network.indexer_urls {
			let resolved_url = indexer_url.url.resolve().await.map_err(|e| {
				ConfigError::parse_error(
					format!("failed to resolve indexer URL: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;
			indexer_url.url = SecretValue::Plain(resolved_url);
		}

		let resolved_store_url = network.store_url.resolve().await.map_err(|e| {
			ConfigError::parse_error(
				format!("failed to resolve store URL: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;
		network.store_url = SecretValue::Plain(resolved_store_url);

		Ok(network)
	}

	/// Load all network configurations from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or default
	/// config directory) as network configurations.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new("config/networks"));
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(
				"networks directory not found",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					network_dir.display().to_string(),
				)])),
			));
		}

		for entry in std::fs::read_dir(network_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read networks directory: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					network_dir.display().to_string(),
				)])),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						network_dir.display().to_string(),
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

			let network = Self::load_from_path(&path).await?;

			let existing_networks: Vec<&Network> =
				pairs.iter().map(|(_, network)| network).collect();
			// Check network name uniqueness before pushing
			Self::validate_uniqueness(&existing_networks, &network, &path.display().to_string())?;

			pairs.push((name, network));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a network configuration from a specific file
	///
	/// Reads and parses a single JSON file as a network configuration.
	async fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open network config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;
		let mut config: Network = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse network config: {}", e),
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
		config.validate()?;

		Ok(config)
	}

	/// Validate the network configuration
	///
	/// Ensures that:
	/// - The network has a valid name and slug
	/// - At least one indexer URL is specified
	/// - The poll program id and store URL are well formed
	/// - Polling intervals are reasonable
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate network name
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		// Validate slug
		if !self
			.slug
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
				None,
				None,
			));
		}

		// Validate indexer URL presence
		if self.indexer_urls.is_empty() {
			return Err(ConfigError::validation_error(
				"At least one indexer URL is required",
				None,
				None,
			));
		}

		// Validate indexer URL types
		let supported_types = ["rest"];
		if !self
			.indexer_urls
			.iter()
			.all(|indexer_url| supported_types.contains(&indexer_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(
				format!(
					"Indexer URL type must be one of: {}",
					supported_types.join(", ")
				),
				None,
				None,
			));
		}

		// Validate indexer URLs format
		if !self.indexer_urls.iter().all(|indexer_url| {
			indexer_url.url.starts_with("http://") || indexer_url.url.starts_with("https://")
		}) {
			return Err(ConfigError::validation_error(
				"All indexer URLs must start with http:// or https://",
				None,
				None,
			));
		}

		// Validate indexer URL weights
		if !self
			.indexer_urls
			.iter()
			.all(|indexer_url| indexer_url.weight <= 100)
		{
			return Err(ConfigError::validation_error(
				"All indexer URL weights must be between 0 and 100",
				None,
				None,
			));
		}

		// Validate program id
		if self.program_id.is_empty() {
			return Err(ConfigError::validation_error(
				"Program id is required",
				None,
				None,
			));
		}
		if !self.program_id.ends_with(".aleo") {
			return Err(ConfigError::validation_error(
				"Program id must end with .aleo",
				None,
				None,
			));
		}

		// Validate store URL format
		if !(self.store_url.starts_with("http://") || self.store_url.starts_with("https://")) {
			return Err(ConfigError::validation_error(
				"Store URL must start with http:// or https://",
				None,
				None,
			));
		}

		// Validate polling intervals
		if self.aggressive_interval_ms < 100 || self.normal_interval_ms < 100 {
			return Err(ConfigError::validation_error(
				"Polling intervals must be at least 100ms",
				None,
				None,
			));
		}
		if self.aggressive_interval_ms > self.normal_interval_ms {
			return Err(ConfigError::validation_error(
				"Aggressive interval must not exceed the normal interval",
				None,
				None,
			));
		}

		// Validate page_limit
		if let Some(page_limit) = self.page_limit {
			if page_limit == 0 {
				return Err(ConfigError::validation_error(
					"page_limit must be greater than 0",
					None,
					None,
				));
			}
		}

		// Log a warning if the network uses an insecure protocol
		self.validate_protocol();

		Ok(())
	}

	/// Validate the safety of the protocol used in the network
	///
	/// Returns if safe, or logs a warning message if unsafe.
	fn validate_protocol(&self) {
		for indexer_url in &self.indexer_urls {
			if indexer_url.url.starts_with("http://") {
				tracing::warn!(
					"Network '{}' uses an insecure indexer URL: {}",
					self.slug,
					indexer_url.url.as_str()
				);
			}
		}
		if self.store_url.starts_with("http://") {
			tracing::warn!(
				"Network '{}' uses an insecure store URL: {}",
				self.slug,
				self.store_url.as_str()
			);
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		let fields = [
			("name", &current_instance.name),
			("slug", &current_instance.slug),
		];

		for (field_name, field_value) in fields {
			if instances.iter().any(|existing_network| {
				let existing_value = match field_name {
					"name" => &existing_network.name,
					"slug" => &existing_network.slug,
					_ => unreachable!(),
				};
				normalize_string(existing_value) == normalize_string(field_value)
			}) {
				return Err(ConfigError::validation_error(
					format!("Duplicate network {} found: '{}'", field_name, field_value),
					None,
					Some(HashMap::from([
						(format!("network_{}", field_name), field_value.to_string()),
						("path".to_string(), file_path.to_string()),
					])),
				));
			}
		}
		Ok(())
	}
}
