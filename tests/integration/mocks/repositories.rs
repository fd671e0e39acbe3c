//! Mock implementations of repository traits.
//!
//! This module provides mock implementations of the repository interfaces used
//! for testing. It includes:
//! - [`MockNetworkRepository`] - Mock implementation of network repository
//! - [`MockWatcherRepository`] - Mock implementation of watcher repository
//!
//! These mocks allow testing repository-dependent functionality without actual
//! file system operations.

use zkpoll_reconciler::{
	models::{Network, Watcher},
	repositories::{
		NetworkRepositoryTrait, NetworkService, RepositoryError, WatcherRepositoryTrait,
	},
};

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use mockall::{mock, predicate::*};

mock! {
	/// Mock implementation of the network repository.
	///
	/// Provides methods to simulate network configuration storage and retrieval
	/// operations for testing purposes.
	pub NetworkRepository {}

	#[async_trait]
	impl NetworkRepositoryTrait for NetworkRepository {
		#[mockall::concretize]
		async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
		where
			Self: Sized;
		#[mockall::concretize]
		async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Network>, RepositoryError>;
		fn get(&self, network_id: &str) -> Option<Network>;
		fn get_all(&self) -> HashMap<String, Network>;
	}

	impl Clone for NetworkRepository {
		fn clone(&self) -> Self {
			Self {}
		}
	}
}

mock! {
	/// Mock implementation of the watcher repository.
	///
	/// Provides methods to simulate watcher configuration storage and retrieval
	/// operations for testing purposes.
	pub WatcherRepository<N: NetworkRepositoryTrait + Send + Sync + 'static> {}

	#[async_trait]
	impl<N: NetworkRepositoryTrait + Send + Sync + 'static> WatcherRepositoryTrait<N>
		for WatcherRepository<N>
	{
		#[mockall::concretize]
		async fn new(
			path: Option<&Path>,
			network_service: Option<NetworkService<N>>,
		) -> Result<Self, RepositoryError>
		where
			Self: Sized;
		#[mockall::concretize]
		async fn load_all(
			path: Option<&Path>,
			network_service: Option<NetworkService<N>>,
		) -> Result<HashMap<String, Watcher>, RepositoryError>;
		fn get(&self, watcher_name: &str) -> Option<Watcher>;
		fn get_all(&self) -> HashMap<String, Watcher>;
	}

	impl<N: NetworkRepositoryTrait + Send + Sync + 'static> Clone for WatcherRepository<N> {
		fn clone(&self) -> Self {
			Self {}
		}
	}
}
