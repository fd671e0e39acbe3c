//! Pending-submission reconciliation service entry point.
//!
//! This binary provides the main entry point for the poll reconciliation
//! service. It initializes all required services, sets up a reconciler for
//! every configured watcher, and handles graceful shutdown on interrupt
//! signals.
//!
//! # Architecture
//! The service is built around several key components:
//! - Watchers: Wallet addresses whose pending poll submissions are tracked
//! - Networks: Supported chain deployments with their indexer and store
//! - Services: Core functionality including reconciliation, matching, and
//!   notifications
//!
//! # Flow
//! 1. Loads configurations from the default directory
//! 2. Initializes core services (repositories, notifications, reconciler)
//! 3. Sets up reconcilers for every active watcher
//! 4. Confirms or fails pending submissions as on-chain state resolves
//! 5. Handles graceful shutdown on Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{
		create_reconciler_service, filter_watchers, has_active_watchers, initialize_services,
		launch_reconcilers, run_sweep, Result,
	},
	models::Network,
	repositories::{NetworkRepository, NetworkService, WatcherRepository, WatcherService},
	utils::{
		constants::DOCUMENTATION_URL, logging::setup_logging,
		metrics::server::create_metrics_server, parse_string_to_bytes_size,
	},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::env::{set_var, var};
use std::path::Path;
use tracing::{error, info};

type WatcherServiceType = WatcherService<WatcherRepository<NetworkRepository>, NetworkRepository>;

#[derive(Parser)]
#[command(
	name = "zkpoll-reconciler",
	about = "A reconciliation service that resolves locally recorded poll submissions against on-chain state, confirming or failing them as the chain settles.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Address to start the metrics server on (default: 127.0.0.1:8081)
	#[arg(long, value_name = "HOST:PORT")]
	metrics_address: Option<String>,

	/// Enable metrics server
	#[arg(long)]
	metrics: bool,

	/// Load watcher configurations from this directory instead of the default
	#[arg(long, value_name = "WATCHER_PATH")]
	watcher_path: Option<String>,

	/// Only run watchers configured for this network
	#[arg(long, value_name = "NETWORK_SLUG")]
	network: Option<String>,

	/// Only run watchers configured for this wallet address
	#[arg(long, value_name = "WALLET_ADDRESS")]
	address: Option<String>,

	/// Run a single reconciliation pass for the selected watchers and exit
	#[arg(long)]
	sweep: bool,

	/// Validate configuration files without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		// Override any existing environment variables
		dotenv_override().ok();

		// Log file mode - override if CLI flag is set
		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Set log level from RUST_LOG if it exists
		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		// Log level - override if CLI flag is set
		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		// Log path - override if CLI flag is set
		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		// Log max size - override if CLI flag is set
		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		// Metrics server - override if CLI flag is set
		if self.metrics {
			set_var("METRICS_ENABLED", "true");
		}

		// Metrics address - override if CLI flag is set
		if let Some(address) = &self.metrics_address {
			// Extract port from address if it's in HOST:PORT format
			if let Some(port) = address.split(':').nth(1) {
				set_var("METRICS_PORT", port);
			}
		}
	}
}

/// Main entry point for the reconciliation service.
///
/// # Errors
/// Returns an error if service initialization fails or if there's an error during shutdown.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Apply CLI options to environment
	cli.apply_to_env();

	// Setup logging to stdout
	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	// If --check flag is provided, only validate configuration and exit
	if cli.check {
		validate_configuration().await;
		return Ok(());
	}

	// Load watchers from a custom directory when requested
	let preloaded_services = match &cli.watcher_path {
		Some(path) => {
			let network_service = NetworkService::<NetworkRepository>::new(None).await?;
			let watcher_service = WatcherServiceType::new(
				Some(Path::new(path)),
				Some(network_service.clone()),
			)
			.await?;
			(Some(watcher_service), Some(network_service))
		}
		None => (None, None),
	};

	let (notification_service, watchers, networks, watcher_service, network_service) =
		initialize_services::<WatcherRepository<NetworkRepository>, NetworkRepository>(
			preloaded_services.0,
			preloaded_services.1,
		)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}. Please refer to the documentation quickstart ({}) on how to configure the service.", e, DOCUMENTATION_URL))?;

	// Narrow the watcher set to the CLI filters before doing anything with it
	let selected_watchers =
		filter_watchers(&watchers, cli.network.as_deref(), cli.address.as_deref());

	// If --sweep flag is provided, reconcile once and exit
	if cli.sweep {
		info!(
			"Running one reconciliation pass for {} watcher(s)",
			selected_watchers.len()
		);
		run_sweep(&notification_service, &selected_watchers, &networks).await?;
		return Ok(());
	}

	// Check if metrics should be enabled from either CLI flag or env var
	let metrics_enabled =
		cli.metrics || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);

	// Extract metrics address as a String to avoid borrowing issues
	let metrics_address = if var("IN_DOCKER").unwrap_or_default() == "true" {
		// For Docker, use METRICS_PORT env var if available
		var("METRICS_PORT")
			.map(|port| format!("0.0.0.0:{}", port))
			.unwrap_or_else(|_| "0.0.0.0:8081".to_string())
	} else {
		// For CLI, use the command line arg or default
		cli.metrics_address
			.map(|s| s.to_string())
			.unwrap_or_else(|| "127.0.0.1:8081".to_string())
	};

	// Start the metrics server if successful
	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);

		// Create the metrics server future
		match create_metrics_server(
			metrics_address,
			watcher_service.clone(),
			network_service.clone(),
		) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	if !selected_watchers.iter().any(|w| !w.paused) {
		info!("No active watchers found. Exiting...");
		return Ok(());
	}

	let reconciler_service = create_reconciler_service();
	launch_reconcilers(
		&reconciler_service,
		&notification_service,
		&selected_watchers,
		&networks,
	)
	.await?;

	info!("Service started. Press Ctrl+C to shutdown");

	let ctrl_c = tokio::signal::ctrl_c();

	if let Some(metrics_future) = metrics_server {
		tokio::select! {
				result = ctrl_c => {
					if let Err(e) = result {
			  error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping services...");
		  }
		  result = metrics_future => {
			if let Err(e) = result {
			  error!("Metrics server error: {}", e);
			}
			info!("Metrics server stopped, shutting down services...");
		  }
		}
	} else {
		let _ = ctrl_c.await;
		info!("Shutdown signal received, stopping services...");
	}

	// Future for all watcher shutdown operations
	let shutdown_futures = selected_watchers
		.iter()
		.map(|watcher| reconciler_service.stop_watcher(&watcher.name));

	for result in futures::future::join_all(shutdown_futures).await {
		if let Err(e) = result {
			error!("Error during shutdown: {}", e);
		}
	}

	tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;

	info!("Shutdown complete");
	Ok(())
}

/// Validates configuration files and their structure
async fn validate_configuration() {
	info!("Validating configuration files...");

	// Initialize services in validation mode to check configurations
	match initialize_services::<WatcherRepository<NetworkRepository>, NetworkRepository>(None, None)
		.await
	{
		Ok((_, watchers, networks, _, _)) => {
			info!("✓ Core services initialized successfully");

			// Check if we have any watchers configured
			if watchers.is_empty() {
				error!("No watchers found. Please refer to the documentation quickstart ({}) for configuration setup.", DOCUMENTATION_URL);
				return;
			}
			let paused = watchers.iter().filter(|w| w.paused).count();
			info!(
				"✓ Found {} watcher(s) ({} active, {} paused)",
				watchers.len(),
				watchers.len() - paused,
				paused
			);

			// Check if we have any networks with active watchers
			let networks_with_watchers: Vec<&Network> = networks
				.values()
				.filter(|network| has_active_watchers(&watchers, &network.slug))
				.collect();

			if networks_with_watchers.is_empty() {
				error!("No networks with active watchers found. Please refer to the documentation quickstart ({}) for network configuration.", DOCUMENTATION_URL);
				return;
			}
			info!(
				"✓ Found {} network(s) with active watchers",
				networks_with_watchers.len()
			);

			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("{}.\nPlease refer to the documentation quickstart ({}) for proper configuration setup.", e, DOCUMENTATION_URL);
		}
	}
}
