//! Watcher configuration repository implementation.
//!
//! This module provides storage and retrieval of watcher configurations,
//! including validation of network references. The repository loads watcher
//! configurations from JSON files and ensures every referenced network exists.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, marker::PhantomData, path::Path};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, Network, Watcher},
	repositories::{
		error::RepositoryError,
		network::{NetworkRepository, NetworkRepositoryTrait, NetworkService},
	},
};

/// Repository for storing and retrieving watcher configurations
#[derive(Clone)]
pub struct WatcherRepository<N: NetworkRepositoryTrait + Send + 'static> {
	/// Map of watcher names to their configurations
	pub watchers: HashMap<String, Watcher>,
	_network_repository: PhantomData<N>,
}

impl<N: NetworkRepositoryTrait + Send + Sync + 'static> WatcherRepository<N> {
	/// Create a new watcher repository from the given path
	///
	/// Loads all watcher configurations from JSON files in the specified directory
	/// (or default config directory if None is provided).
	pub async fn new(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<Self, RepositoryError> {
		let watchers = Self::load_all(path, network_service).await?;
		Ok(WatcherRepository {
			watchers,
			_network_repository: PhantomData,
		})
	}

	/// Create a new watcher repository from a list of watchers
	pub fn new_with_watchers(watchers: HashMap<String, Watcher>) -> Self {
		WatcherRepository {
			watchers,
			_network_repository: PhantomData,
		}
	}

	/// Returns an error if any watcher references a non-existent network.
	pub fn validate_watcher_references(
		watchers: &HashMap<String, Watcher>,
		networks: &HashMap<String, Network>,
	) -> Result<(), RepositoryError> {
		let mut validation_errors = Vec::new();
		let mut metadata = HashMap::new();

		for (watcher_name, watcher) in watchers {
			if !networks.contains_key(&watcher.network) {
				validation_errors.push(format!(
					"Watcher '{}' references non-existent network '{}'",
					watcher_name, watcher.network
				));
				metadata.insert(
					format!("watcher_{}_invalid_network", watcher_name),
					watcher.network.clone(),
				);
			}
		}

		if !validation_errors.is_empty() {
			return Err(RepositoryError::validation_error(
				format!(
					"Configuration validation failed:\n{}",
					validation_errors.join("\n"),
				),
				None,
				Some(metadata),
			));
		}

		Ok(())
	}
}

/// Interface for watcher repository implementations
///
/// This trait defines the standard operations that any watcher repository must support,
/// allowing for different storage backends while maintaining a consistent interface.
#[async_trait]
pub trait WatcherRepositoryTrait<N: NetworkRepositoryTrait + Send + 'static>: Clone + Send {
	/// Create a new watcher repository from the given path
	async fn new(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all watcher configurations from the given path
	///
	/// If no path is provided, uses the default config directory.
	/// Also validates references to networks.
	/// This is a static method that doesn't require an instance.
	async fn load_all(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<HashMap<String, Watcher>, RepositoryError>;

	/// Get a specific watcher by name
	///
	/// Returns None if the watcher doesn't exist.
	fn get(&self, watcher_name: &str) -> Option<Watcher>;

	/// Get all watchers
	///
	/// Returns a copy of the watcher map to prevent external mutation.
	fn get_all(&self) -> HashMap<String, Watcher>;
}

#[async_trait]
impl<N: NetworkRepositoryTrait + Send + Sync + 'static> WatcherRepositoryTrait<N>
	for WatcherRepository<N>
{
	async fn new(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<Self, RepositoryError> {
		WatcherRepository::new(path, network_service).await
	}

	async fn load_all(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<HashMap<String, Watcher>, RepositoryError> {
		let watchers = Watcher::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load watchers",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})?;

		let networks = match network_service {
			Some(service) => service.get_all(),
			None => {
				NetworkRepository::new(None)
					.await
					.map_err(|e| {
						RepositoryError::load_error(
							"Failed to load networks for watcher validation",
							Some(Box::new(e)),
							None,
						)
					})?
					.networks
			}
		};

		Self::validate_watcher_references(&watchers, &networks)?;
		Ok(watchers)
	}

	fn get(&self, watcher_name: &str) -> Option<Watcher> {
		self.watchers.get(watcher_name).cloned()
	}

	fn get_all(&self) -> HashMap<String, Watcher> {
		self.watchers.clone()
	}
}

/// Service layer for watcher repository operations
///
/// This type provides a higher-level interface for working with watcher configurations,
/// handling repository initialization and access through a trait-based interface.
/// It also ensures that all watcher references to networks are valid.
#[derive(Clone)]
pub struct WatcherService<
	W: WatcherRepositoryTrait<N> + Send,
	N: NetworkRepositoryTrait + Send + Sync + 'static,
> {
	repository: W,
	_network_repository: PhantomData<N>,
}

impl<W: WatcherRepositoryTrait<N> + Send, N: NetworkRepositoryTrait + Send + Sync + 'static>
	WatcherService<W, N>
{
	/// Create a new watcher service with the default repository implementation
	///
	/// Loads watcher configurations from the specified path (or default config
	/// directory) and validates all network references.
	pub async fn new(
		path: Option<&Path>,
		network_service: Option<NetworkService<N>>,
	) -> Result<WatcherService<W, N>, RepositoryError> {
		let repository = W::new(path, network_service).await?;
		Ok(WatcherService {
			repository,
			_network_repository: PhantomData,
		})
	}

	/// Create a new watcher service with a specific configuration path
	///
	/// Similar to `new()` but makes the path parameter more explicit.
	pub async fn new_with_path(path: Option<&Path>) -> Result<WatcherService<W, N>, RepositoryError> {
		let repository = W::new(path, None).await?;
		Ok(WatcherService {
			repository,
			_network_repository: PhantomData,
		})
	}

	/// Create a new watcher service with a custom repository implementation
	///
	/// Allows for using alternative storage backends that implement the WatcherRepositoryTrait.
	pub fn new_with_repository(repository: W) -> Result<Self, RepositoryError> {
		Ok(WatcherService {
			repository,
			_network_repository: PhantomData,
		})
	}

	/// Get a specific watcher by name
	///
	/// Returns None if the watcher doesn't exist.
	pub fn get(&self, watcher_name: &str) -> Option<Watcher> {
		self.repository.get(watcher_name)
	}

	/// Get all watchers
	///
	/// Returns a copy of the watcher map to prevent external mutation.
	pub fn get_all(&self) -> HashMap<String, Watcher> {
		self.repository.get_all()
	}
}
