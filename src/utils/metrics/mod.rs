//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines specific metrics for the application.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use sysinfo::{Disks, System};

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure via the metrics endpoint.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Gauge for CPU usage percentage.
	///
	/// Tracks the current CPU usage as a percentage (0-100) across all cores.
	pub static ref CPU_USAGE: Gauge = {
	  let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
	  REGISTRY.register(Box::new(gauge.clone())).unwrap();
	  gauge
	};

	/// Gauge for memory usage percentage.
	///
	/// Tracks the percentage (0-100) of total system memory currently in use.
	pub static ref MEMORY_USAGE_PERCENT: Gauge = {
	  let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
	  REGISTRY.register(Box::new(gauge.clone())).unwrap();
	  gauge
	};

	/// Gauge for memory usage in bytes.
	///
	/// Tracks the absolute amount of memory currently in use by the system in bytes.
	pub static ref MEMORY_USAGE: Gauge = {
		let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for total memory in bytes.
	///
	/// Tracks the total amount of physical memory available on the system in bytes.
	pub static ref TOTAL_MEMORY: Gauge = {
	  let gauge = Gauge::new("total_memory_bytes", "Total memory in bytes").unwrap();
	  REGISTRY.register(Box::new(gauge.clone())).unwrap();
	  gauge
	};

	/// Gauge for available memory in bytes.
	///
	/// Tracks the amount of memory currently available for allocation in bytes.
	pub static ref AVAILABLE_MEMORY: Gauge = {
		let gauge = Gauge::new("available_memory_bytes", "Available memory in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for used disk space in bytes.
	///
	/// Tracks the total amount of disk space currently in use across all mounted filesystems in bytes.
	pub static ref DISK_USAGE: Gauge = {
	  let gauge = Gauge::new("disk_usage_bytes", "Used disk space in bytes").unwrap();
	  REGISTRY.register(Box::new(gauge.clone())).unwrap();
	  gauge
	};

	/// Gauge for disk usage percentage.
	///
	/// Tracks the percentage (0-100) of total disk space currently in use across all mounted filesystems.
	pub static ref DISK_USAGE_PERCENT: Gauge = {
	  let gauge = Gauge::new("disk_usage_percentage", "Disk usage percentage").unwrap();
	  REGISTRY.register(Box::new(gauge.clone())).unwrap();
	  gauge
	};

	/// Gauge for total number of watchers (active and paused).
	///
	/// Tracks the total count of all configured watchers, regardless of their paused state.
	pub static ref WATCHERS_TOTAL: Gauge = {
		let gauge = Gauge::new("watchers_total", "Total number of configured watchers").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for number of active watchers (not paused).
	///
	/// Tracks the count of watchers that are currently reconciling (not in paused state).
	pub static ref WATCHERS_ACTIVE: Gauge = {
		let gauge = Gauge::new("watchers_active", "Number of active watchers").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for total number of configured networks.
	///
	/// Tracks the count of all network configurations loaded from disk.
	pub static ref NETWORKS_CONFIGURED: Gauge = {
		let gauge = Gauge::new("networks_configured", "Total number of configured networks").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for total number of networks being reconciled.
	///
	/// Tracks the count of unique networks that have at least one active watcher.
	pub static ref NETWORKS_WATCHED: Gauge = {
		let gauge = Gauge::new("networks_watched", "Total number of networks being reconciled").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge Vector for per-network metrics.
	///
	/// Tracks the number of active watchers for each network, with the network slug as a label.
	pub static ref NETWORK_WATCHERS: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("network_watchers", "Number of watchers per network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge Vector for pending submissions per network.
	///
	/// Tracks the number of submissions currently awaiting confirmation, refreshed
	/// at the end of every reconciliation pass.
	pub static ref SUBMISSIONS_PENDING: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("submissions_pending", "Number of pending submissions per network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Counter Vector for confirmed submissions per network.
	///
	/// Counts submissions matched to an on-chain poll since the process started.
	pub static ref SUBMISSIONS_CONFIRMED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("submissions_confirmed", "Submissions confirmed since startup"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter Vector for failed submissions per network.
	///
	/// Counts submissions marked failed (expiry included) since the process started.
	pub static ref SUBMISSIONS_FAILED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("submissions_failed", "Submissions marked failed since startup"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter Vector for reconciliation ticks per network.
	///
	/// Counts completed reconciliation passes, regardless of outcome.
	pub static ref RECONCILER_TICKS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("reconciler_ticks", "Reconciliation passes since startup"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Updates the system metrics for CPU and memory usage.
pub fn update_system_metrics() {
	let mut sys = System::new_all();
	sys.refresh_all();

	// Overall CPU usage.
	let cpu_usage = sys.global_cpu_usage();
	CPU_USAGE.set(cpu_usage as f64);

	// Total memory (in bytes).
	let total_memory = sys.total_memory();
	TOTAL_MEMORY.set(total_memory as f64);

	// Available memory (in bytes).
	let available_memory = sys.available_memory();
	AVAILABLE_MEMORY.set(available_memory as f64);

	// Used memory (in bytes).
	let memory_usage = sys.used_memory();
	MEMORY_USAGE.set(memory_usage as f64);

	// Calculate memory usage percentage
	let memory_percentage = if total_memory > 0 {
		(memory_usage as f64 / total_memory as f64) * 100.0
	} else {
		0.0
	};
	MEMORY_USAGE_PERCENT.set(memory_percentage);

	// Calculate disk usage:
	// Sum total space and available space across all disks.
	let disks = Disks::new_with_refreshed_list();
	let mut total_disk_space: u64 = 0;
	let mut total_disk_available: u64 = 0;
	for disk in disks.list() {
		total_disk_space += disk.total_space();
		total_disk_available += disk.available_space();
	}
	// Used disk space is total minus available ( in bytes).
	let used_disk_space = total_disk_space.saturating_sub(total_disk_available);
	DISK_USAGE.set(used_disk_space as f64);

	// Calculate disk usage percentage.
	let disk_percentage = if total_disk_space > 0 {
		(used_disk_space as f64 / total_disk_space as f64) * 100.0
	} else {
		0.0
	};
	DISK_USAGE_PERCENT.set(disk_percentage);
}

/// Updates metrics related to watchers and networks.
pub fn update_watcher_metrics(
	watchers: &std::collections::HashMap<String, crate::models::Watcher>,
	networks: &std::collections::HashMap<String, crate::models::Network>,
) {
	// Track total and active watchers
	let total_watchers = watchers.len();
	let active_watchers = watchers.values().filter(|w| !w.paused).count();

	WATCHERS_TOTAL.set(total_watchers as f64);
	WATCHERS_ACTIVE.set(active_watchers as f64);

	// Track configured networks
	NETWORKS_CONFIGURED.set(networks.len() as f64);

	// Count networks being reconciled (those with active watchers)
	let mut networks_with_watchers = std::collections::HashSet::new();
	for watcher in watchers.values().filter(|w| !w.paused) {
		// Only count networks that exist in our repository
		if networks.contains_key(&watcher.network) {
			networks_with_watchers.insert(watcher.network.clone());
		}
	}
	NETWORKS_WATCHED.set(networks_with_watchers.len() as f64);

	// Reset all network-specific metrics
	NETWORK_WATCHERS.reset();

	// Set per-network watcher counts (only for networks that exist)
	let mut network_watcher_counts = std::collections::HashMap::<String, usize>::new();
	for watcher in watchers.values().filter(|w| !w.paused) {
		if networks.contains_key(&watcher.network) {
			*network_watcher_counts
				.entry(watcher.network.clone())
				.or_insert(0) += 1;
		}
	}

	for (network, count) in network_watcher_counts {
		NETWORK_WATCHERS
			.with_label_values(&[&network])
			.set(count as f64);
	}
}
