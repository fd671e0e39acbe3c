//! Reconciliation service implementation.
//!
//! Provides functionality to resolve locally recorded pending submissions
//! against on-chain poll listings across multiple watchers, managing an
//! individual polling loop for each watcher and coordinating the
//! reconciliation passes.

use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
	time::Duration,
};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::{
	models::{Network, OnChainPollRecord, Watcher},
	services::{
		codec::{decode_poll_record, parse_u64_value},
		indexer::IndexerClient,
		matcher::MatchStrategy,
		notification::Notifier,
		reconciler::{error::ReconcilerError, scheduler::IntervalScheduler},
		tracker::{PendingStore, StateTransitioner, SubmissionLedger},
	},
	utils::metrics::{
		RECONCILER_TICKS, SUBMISSIONS_CONFIRMED, SUBMISSIONS_FAILED, SUBMISSIONS_PENDING,
	},
};

/// On-chain mapping listing every poll record by sequential id
const POLLS_MAPPING: &str = "polls";

/// State shared by every pass of a single watcher's polling loop
struct TickContext<I, S>
where
	I: IndexerClient,
	S: PendingStore,
{
	watcher: Watcher,
	network: Network,
	indexer: Arc<I>,
	store: Arc<S>,
	ledger: SubmissionLedger,
	matcher: Arc<dyn MatchStrategy>,
	transitioner: Arc<StateTransitioner<S>>,
	last_height: Mutex<Option<u64>>,
}

impl<I, S> TickContext<I, S>
where
	I: IndexerClient,
	S: PendingStore,
{
	/// Runs one reconciliation pass and reports the cadence for the next
	///
	/// A failed pass is logged and retried on the next tick rather than
	/// stopping the loop. The cadence tightens while the working set holds
	/// unresolved submissions and relaxes once it is clear.
	async fn run_tick(&self) -> Option<Duration> {
		let _ = self.reconcile().await;

		let aggressive = self.ledger.has_unresolved().await;
		Some(Duration::from_millis(self.network.interval_for(aggressive)))
	}

	/// Executes one reconciliation pass for this watcher
	///
	/// Fetches the on-chain poll listing, confirms pending submissions that
	/// match a listed record, fails submissions past their expiry and then
	/// refreshes the working set from the durable store.
	#[instrument(skip_all, fields(watcher = self.watcher.name, network = self.network.slug))]
	async fn reconcile(&self) -> Result<(), ReconcilerError> {
		RECONCILER_TICKS
			.with_label_values(&[&self.network.slug])
			.inc();

		let candidates = self.fetch_candidates().await?;
		self.resolve_pending(&candidates).await;
		self.observe_block_height().await;
		self.refresh_ledger().await?;
		Ok(())
	}

	/// Fetches and decodes the full on-chain poll listing
	///
	/// Pages through the mapping until a short page signals the end.
	/// Entries that fail to decode are skipped so one damaged record cannot
	/// hide the rest of the listing.
	async fn fetch_candidates(&self) -> Result<Vec<OnChainPollRecord>, ReconcilerError> {
		let limit = self.network.effective_page_limit();
		let mut records = Vec::new();
		let mut page = 0u32;

		loop {
			let entries = self
				.indexer
				.get_mapping_values(&self.network.program_id, POLLS_MAPPING, page, limit)
				.await
				.map_err(|e| {
					ReconcilerError::processing_error(
						"Failed to fetch on-chain poll listing",
						Some(e.into()),
						Some(HashMap::from([
							("network".to_string(), self.network.slug.clone()),
							("watcher".to_string(), self.watcher.name.clone()),
						])),
					)
				})?;

			let last_page = entries.len() < limit as usize;
			records.extend(
				entries
					.iter()
					.filter_map(|entry| decode_poll_record(parse_u64_value(&entry.key), &entry.value)),
			);

			if last_page {
				break;
			}
			page += 1;
		}

		Ok(records)
	}

	/// Confirms matched submissions and fails those past their expiry
	///
	/// A submission that both matches a listed record and has expired is
	/// confirmed: the listing is the source of truth. A confirmed record id
	/// is withheld from later submissions in the same pass, so duplicates
	/// that match the same record resolve one at a time. Per-submission
	/// store failures are logged and retried on the next pass.
	async fn resolve_pending(&self, candidates: &[OnChainPollRecord]) {
		let now = Utc::now();
		let mut claimed: HashSet<u64> = HashSet::new();

		for submission in self.ledger.snapshot().await {
			if !submission.is_pending() {
				continue;
			}

			let matched = candidates
				.iter()
				.filter(|record| !claimed.contains(&record.id))
				.find(|record| self.matcher.matches(&submission, record));

			if let Some(record) = matched {
				match self.transitioner.confirm(&submission.id, record.id).await {
					Ok(transitioned) => {
						if transitioned {
							claimed.insert(record.id);
							SUBMISSIONS_CONFIRMED
								.with_label_values(&[&self.network.slug])
								.inc();
						}
					}
					Err(e) => {
						tracing::warn!(
							"Failed to confirm submission '{}' as poll {}: {}",
							submission.id,
							record.id,
							e
						);
					}
				}
				continue;
			}

			if submission.is_expired_at(now) {
				match self
					.transitioner
					.fail(
						&submission.id,
						Some("expired before confirmation".to_string()),
					)
					.await
				{
					Ok(transitioned) => {
						if transitioned {
							SUBMISSIONS_FAILED
								.with_label_values(&[&self.network.slug])
								.inc();
						}
					}
					Err(e) => {
						tracing::warn!(
							"Failed to expire submission '{}': {}",
							submission.id,
							e
						);
					}
				}
			}
		}
	}

	/// Logs indexer head movement so a stalled indexer is visible
	///
	/// Height observation is strictly diagnostic; failures here never fail
	/// the pass.
	async fn observe_block_height(&self) {
		match self.indexer.get_block_height().await {
			Ok(Some(height)) => {
				let mut last = self.last_height.lock().await;
				if let Some(previous) = *last {
					if height <= previous {
						tracing::warn!(
							"Indexer head for network {} has not advanced: {} (was {})",
							self.network.slug,
							height,
							previous
						);
					}
				}
				*last = Some(height);
			}
			Ok(None) => {
				tracing::debug!(
					"Indexer for network {} reports no block height yet",
					self.network.slug
				);
			}
			Err(e) => {
				tracing::warn!(
					"Failed to read block height for network {}: {}",
					self.network.slug,
					e
				);
			}
		}
	}

	/// Reloads the working set from the durable store
	async fn refresh_ledger(&self) -> Result<(), ReconcilerError> {
		let listing = self
			.store
			.list_pending(&self.watcher.address, &self.network.slug)
			.await
			.map_err(|e| {
				ReconcilerError::processing_error(
					"Failed to refresh pending submissions from store",
					Some(e.into()),
					Some(HashMap::from([
						("network".to_string(), self.network.slug.clone()),
						("watcher".to_string(), self.watcher.name.clone()),
					])),
				)
			})?;

		SUBMISSIONS_PENDING
			.with_label_values(&[&self.network.slug])
			.set(listing.iter().filter(|s| s.is_pending()).count() as f64);

		self.ledger.replace_all(listing).await;
		Ok(())
	}
}

/// Reconciler for a single watcher
///
/// Owns the timer driving reconciliation passes for one watcher, running at
/// the aggressive cadence while unresolved submissions remain and the normal
/// cadence otherwise.
pub struct WatcherReconciler<I, S>
where
	I: IndexerClient,
	S: PendingStore,
{
	context: Arc<TickContext<I, S>>,
	scheduler: Option<IntervalScheduler>,
}

impl<I, S> WatcherReconciler<I, S>
where
	I: IndexerClient + 'static,
	S: PendingStore + 'static,
{
	/// Creates a new watcher reconciler
	///
	/// # Arguments
	/// * `watcher` - Watcher configuration
	/// * `network` - Network configuration the watcher runs against
	/// * `indexer` - Indexer client for the network
	/// * `store` - Durable store client
	/// * `matcher` - Strategy pairing submissions with on-chain records
	/// * `notifier` - Channel announcing confirmations, `None` to log only
	pub fn new(
		watcher: Watcher,
		network: Network,
		indexer: Arc<I>,
		store: Arc<S>,
		matcher: Arc<dyn MatchStrategy>,
		notifier: Option<Arc<dyn Notifier>>,
	) -> Self {
		let ledger = SubmissionLedger::new();
		let transitioner = Arc::new(StateTransitioner::new(
			ledger.clone(),
			store.clone(),
			notifier,
		));

		Self {
			context: Arc::new(TickContext {
				watcher,
				network,
				indexer,
				store,
				ledger,
				matcher,
				transitioner,
				last_height: Mutex::new(None),
			}),
			scheduler: None,
		}
	}

	/// Starts the polling loop for this watcher
	///
	/// Seeds the working set from the durable store, then begins ticking.
	/// A seeding failure starts the loop with an empty working set; the
	/// first refresh heals it once the store answers again. Starting an
	/// already running reconciler is a no-op.
	pub async fn start(&mut self) -> Result<(), ReconcilerError> {
		if self.scheduler.is_some() {
			return Ok(());
		}

		if let Err(e) = self.context.refresh_ledger().await {
			tracing::warn!(
				"Could not seed working set for watcher '{}', starting empty: {}",
				self.context.watcher.name,
				e
			);
		}

		let aggressive = self.context.ledger.has_unresolved().await;
		let initial = Duration::from_millis(self.context.network.interval_for(aggressive));

		let context = self.context.clone();
		self.scheduler = Some(IntervalScheduler::start(initial, move || {
			let context = context.clone();
			async move { context.run_tick().await }
		}));

		tracing::info!(
			"Started reconciler for watcher: {}",
			self.context.watcher.name
		);
		Ok(())
	}

	/// Stops the polling loop
	///
	/// Waits for any in-flight pass to complete before returning. Stopping
	/// a reconciler that is not running is a no-op.
	pub async fn stop(&mut self) -> Result<(), ReconcilerError> {
		if let Some(mut scheduler) = self.scheduler.take() {
			scheduler.stop().await?;
			tracing::info!(
				"Stopped reconciler for watcher: {}",
				self.context.watcher.name
			);
		}
		Ok(())
	}
}

/// Map of active watcher reconcilers
type WatcherReconcilersMap<I, S> = HashMap<String, WatcherReconciler<I, S>>;

/// Service for managing reconcilers across multiple watchers
///
/// Coordinates reconciliation for every configured watcher, managing the
/// individual reconcilers and their lifecycles.
pub struct ReconcilerService<I, S>
where
	I: IndexerClient,
	S: PendingStore,
{
	matcher: Arc<dyn MatchStrategy>,
	active_reconcilers: Arc<RwLock<WatcherReconcilersMap<I, S>>>,
}

impl<I, S> ReconcilerService<I, S>
where
	I: IndexerClient + 'static,
	S: PendingStore + 'static,
{
	/// Creates a new reconciler service using the given matching strategy
	///
	/// # Arguments
	/// * `matcher` - Strategy applied by every watcher started through this
	///   service
	pub fn new(matcher: Arc<dyn MatchStrategy>) -> Self {
		Self {
			matcher,
			active_reconcilers: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Starts a reconciler for a specific watcher
	///
	/// Paused watchers are acknowledged but not scheduled. Starting a
	/// watcher that is already running is a no-op.
	///
	/// # Arguments
	/// * `watcher` - Watcher configuration to start
	/// * `network` - Network configuration the watcher runs against
	/// * `indexer` - Indexer client for the network
	/// * `store` - Durable store client for the network
	/// * `notifier` - Channel announcing confirmations, `None` to log only
	pub async fn start_watcher(
		&self,
		watcher: &Watcher,
		network: &Network,
		indexer: Arc<I>,
		store: Arc<S>,
		notifier: Option<Arc<dyn Notifier>>,
	) -> Result<(), ReconcilerError> {
		let mut reconcilers = self.active_reconcilers.write().await;

		if reconcilers.contains_key(&watcher.name) {
			tracing::info!("Reconciler already running for watcher: {}", watcher.name);
			return Ok(());
		}

		if watcher.paused {
			tracing::info!("Watcher '{}' is paused, not scheduling", watcher.name);
			return Ok(());
		}

		let mut reconciler = WatcherReconciler::new(
			watcher.clone(),
			network.clone(),
			indexer,
			store,
			self.matcher.clone(),
			notifier,
		);

		reconciler.start().await?;
		reconcilers.insert(watcher.name.clone(), reconciler);

		Ok(())
	}

	/// Stops the reconciler for a specific watcher
	///
	/// # Arguments
	/// * `watcher_name` - Name of the watcher to stop
	pub async fn stop_watcher(&self, watcher_name: &str) -> Result<(), ReconcilerError> {
		let mut reconcilers = self.active_reconcilers.write().await;

		if let Some(mut reconciler) = reconcilers.remove(watcher_name) {
			reconciler.stop().await?;
		}

		Ok(())
	}

	/// Stops every running reconciler
	pub async fn stop_all(&self) -> Result<(), ReconcilerError> {
		let mut reconcilers = self.active_reconcilers.write().await;

		for (_, mut reconciler) in reconcilers.drain() {
			reconciler.stop().await?;
		}

		Ok(())
	}

	/// Number of watchers currently scheduled
	pub async fn active_count(&self) -> usize {
		self.active_reconcilers.read().await.len()
	}
}

/// Runs a single reconciliation pass for a watcher
///
/// Used by one-shot invocations that reconcile without scheduling a timer.
/// The working set is seeded from the durable store before the pass, so a
/// store outage fails the run instead of silently reconciling nothing.
///
/// # Arguments
/// * `watcher` - Watcher configuration
/// * `network` - Network configuration the watcher runs against
/// * `indexer` - Indexer client for the network
/// * `store` - Durable store client for the network
/// * `matcher` - Strategy pairing submissions with on-chain records
/// * `notifier` - Channel announcing confirmations, `None` to log only
///
/// # Returns
/// * `Result<(), ReconcilerError>` - Success or error
pub async fn reconcile_once<I, S>(
	watcher: &Watcher,
	network: &Network,
	indexer: Arc<I>,
	store: Arc<S>,
	matcher: Arc<dyn MatchStrategy>,
	notifier: Option<Arc<dyn Notifier>>,
) -> Result<(), ReconcilerError>
where
	I: IndexerClient,
	S: PendingStore,
{
	let ledger = SubmissionLedger::new();
	let transitioner = Arc::new(StateTransitioner::new(
		ledger.clone(),
		store.clone(),
		notifier,
	));
	let context = TickContext {
		watcher: watcher.clone(),
		network: network.clone(),
		indexer,
		store,
		ledger,
		matcher,
		transitioner,
		last_height: Mutex::new(None),
	};

	context.refresh_ledger().await?;
	context.reconcile().await
}
