//! Domain models and data structures for pending-poll reconciliation.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Network, Watcher, PendingSubmission, on-chain records)
//! - `security`: Security models (Secret)

mod config;
mod core;
mod security;

// Re-export core types
pub use core::{
	DistributionMode, IndexerUrl, Network, NewSubmission, NotificationMessage, OnChainPollRecord,
	PendingSubmission, PollSettings, PollStatus, PoolState, PrivacyMode, StakePosition,
	SubmissionStatus, Visibility, Watcher, WatcherNotifications,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};

// Re-export security types
pub use security::{SecretString, SecretValue, SecurityError};
