//! Bootstrap module for initializing services and launching reconcilers.
//!
//! This module provides functions to initialize the configuration services and
//! wire a reconciler to every configured watcher. It also includes helper
//! functions for selecting watchers by network or wallet address.
//!
//! # Services
//! - `NotificationService`: Builds per-watcher webhook notifiers
//! - `ReconcilerService`: Manages the polling loop of every watcher
//!
//! # Entry points
//! - `initialize_services`: Loads and validates the network and watcher
//!   configurations
//! - `launch_reconcilers`: Starts a reconciler for every runnable watcher
//! - `run_sweep`: Runs a single reconciliation pass per watcher and returns

use std::{collections::HashMap, error::Error, sync::Arc};
use tokio::sync::Mutex;

use crate::{
	models::{Network, Watcher},
	repositories::{
		NetworkRepositoryTrait, NetworkService, WatcherRepositoryTrait, WatcherService,
	},
	services::{
		indexer::HttpIndexerClient,
		matcher::{MatchStrategy, TitleCreatorMatcher},
		notification::NotificationService,
		reconciler::{reconcile_once, ReconcilerService},
		tracker::HttpPendingStore,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

type ServiceResult<W, N> = Result<(
	Arc<NotificationService>,
	Vec<Watcher>,
	HashMap<String, Network>,
	Arc<Mutex<WatcherService<W, N>>>,
	Arc<Mutex<NetworkService<N>>>,
)>;

/// Reconciler service wired to the production HTTP clients
pub type HttpReconcilerService = ReconcilerService<HttpIndexerClient, HttpPendingStore>;

/// Initializes all required services for the reconciler daemon.
///
/// # Returns
/// Returns a tuple containing:
/// - NotificationService: Builds per-watcher webhook notifiers
/// - `Vec<Watcher>`: List of configured watchers, paused ones included
/// - `HashMap<String, Network>`: Available networks indexed by slug
/// - `Arc<Mutex<WatcherService>>`: Data access for watcher configs
/// - `Arc<Mutex<NetworkService>>`: Data access for network configs
///
/// # Errors
/// Returns an error if any configuration fails to load or validate
pub async fn initialize_services<W, N>(
	watcher_service: Option<WatcherService<W, N>>,
	network_service: Option<NetworkService<N>>,
) -> ServiceResult<W, N>
where
	W: WatcherRepositoryTrait<N> + Send + Sync + 'static,
	N: NetworkRepositoryTrait + Send + Sync + 'static,
{
	let network_service = match network_service {
		Some(service) => service,
		None => {
			let repository = N::new(None).await?;
			NetworkService::<N>::new_with_repository(repository)?
		}
	};

	let watcher_service = match watcher_service {
		Some(service) => service,
		None => {
			let repository = W::new(None, Some(network_service.clone())).await?;
			WatcherService::<W, N>::new_with_repository(repository)?
		}
	};

	let notification_service = Arc::new(NotificationService::new());

	let watchers = watcher_service.get_all().into_values().collect::<Vec<_>>();
	let networks = network_service.get_all();

	Ok((
		notification_service,
		watchers,
		networks,
		Arc::new(Mutex::new(watcher_service)),
		Arc::new(Mutex::new(network_service)),
	))
}

/// Creates the reconciler service used to drive every watcher.
///
/// Submissions are paired with on-chain records by case-insensitive title and
/// creator equality.
pub fn create_reconciler_service() -> HttpReconcilerService {
	ReconcilerService::new(Arc::new(TitleCreatorMatcher::new()))
}

/// Starts a reconciler for every runnable watcher.
///
/// One indexer client and one store client are built per network and shared
/// by its watchers. Paused watchers are acknowledged by the reconciler
/// service without being scheduled. Watchers referencing an unknown network
/// are skipped with a warning; configuration validation normally rejects
/// them before this point.
///
/// # Arguments
/// * `reconciler_service` - Service managing the watcher reconcilers
/// * `notification_service` - Service building per-watcher notifiers
/// * `watchers` - Watchers to start
/// * `networks` - Available networks indexed by slug
///
/// # Errors
/// Returns an error if a client cannot be constructed or a reconciler fails
/// to start
pub async fn launch_reconcilers(
	reconciler_service: &HttpReconcilerService,
	notification_service: &NotificationService,
	watchers: &[Watcher],
	networks: &HashMap<String, Network>,
) -> Result<()> {
	let mut indexers: HashMap<String, Arc<HttpIndexerClient>> = HashMap::new();
	let mut stores: HashMap<String, Arc<HttpPendingStore>> = HashMap::new();

	for watcher in watchers {
		let Some(network) = networks.get(&watcher.network) else {
			tracing::warn!(
				"Skipping watcher '{}': unknown network '{}'",
				watcher.name,
				watcher.network
			);
			continue;
		};

		let indexer = if let Some(client) = indexers.get(&network.slug) {
			client.clone()
		} else {
			let client = Arc::new(HttpIndexerClient::new(network)?);
			indexers.insert(network.slug.clone(), client.clone());
			client
		};

		let store = if let Some(client) = stores.get(&network.slug) {
			client.clone()
		} else {
			let client = Arc::new(HttpPendingStore::new(network)?);
			stores.insert(network.slug.clone(), client.clone());
			client
		};

		let notifier = notification_service.notifier_for(watcher).await?;

		reconciler_service
			.start_watcher(watcher, network, indexer, store, notifier)
			.await?;
	}

	Ok(())
}

/// Runs one reconciliation pass for every runnable watcher, then returns.
///
/// Used by one-shot invocations that resolve outstanding submissions without
/// leaving a daemon behind. Paused watchers are skipped.
///
/// # Arguments
/// * `notification_service` - Service building per-watcher notifiers
/// * `watchers` - Watchers to sweep
/// * `networks` - Available networks indexed by slug
///
/// # Errors
/// Returns an error if a pass fails; remaining watchers are not attempted
pub async fn run_sweep(
	notification_service: &NotificationService,
	watchers: &[Watcher],
	networks: &HashMap<String, Network>,
) -> Result<()> {
	let matcher: Arc<dyn MatchStrategy> = Arc::new(TitleCreatorMatcher::new());

	for watcher in watchers {
		if watcher.paused {
			tracing::info!("Watcher '{}' is paused, skipping sweep", watcher.name);
			continue;
		}

		let Some(network) = networks.get(&watcher.network) else {
			tracing::warn!(
				"Skipping watcher '{}': unknown network '{}'",
				watcher.name,
				watcher.network
			);
			continue;
		};

		let indexer = Arc::new(HttpIndexerClient::new(network)?);
		let store = Arc::new(HttpPendingStore::new(network)?);
		let notifier = notification_service.notifier_for(watcher).await?;

		reconcile_once(watcher, network, indexer, store, matcher.clone(), notifier).await?;
		tracing::info!("Completed reconciliation pass for watcher: {}", watcher.name);
	}

	Ok(())
}

/// Checks if a network has any active watchers.
///
/// # Arguments
/// * `watchers` - List of watchers to check
/// * `network_slug` - Network identifier to check for
///
/// # Returns
/// Returns true if there are any active watchers for the given network
pub fn has_active_watchers(watchers: &[Watcher], network_slug: &str) -> bool {
	watchers
		.iter()
		.any(|w| w.network == network_slug && !w.paused)
}

/// Selects the watchers matching the optional network and address filters.
///
/// An empty filter selects everything, so running without CLI filters sweeps
/// or schedules the full configuration.
///
/// # Arguments
/// * `watchers` - List of watchers to filter
/// * `network_slug` - Optional network identifier to filter by
/// * `address` - Optional wallet address to filter by
///
/// # Returns
/// Returns a vector of watchers passing every supplied filter
pub fn filter_watchers(
	watchers: &[Watcher],
	network_slug: Option<&str>,
	address: Option<&str>,
) -> Vec<Watcher> {
	watchers
		.iter()
		.filter(|w| network_slug.is_none_or(|slug| w.network == slug))
		.filter(|w| address.is_none_or(|addr| w.address == addr))
		.cloned()
		.collect()
}
