//! Repository implementations for configuration management.
//!
//! This module provides traits and implementations for loading and managing
//! configuration data from the filesystem. Each repository type handles a specific
//! configuration type and provides:
//!
//! - Loading configurations from JSON files
//! - Validating configuration references between different types
//! - Accessing configurations through a service layer
//!
//! Currently supported repositories:
//! - Network: Loads network configurations defining indexer endpoints and polling cadence
//! - Watcher: Loads and validates watcher configurations, ensuring referenced networks exist

mod error;
mod network;
mod watcher;

pub use error::RepositoryError;
pub use network::{NetworkRepository, NetworkRepositoryTrait, NetworkService};
pub use watcher::{WatcherRepository, WatcherRepositoryTrait, WatcherService};
