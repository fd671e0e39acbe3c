//! Core domain models for the reconciliation service.
//!
//! This module contains the fundamental data structures that represent:
//! - Submissions: Locally tracked poll-creation intents and their lifecycle
//! - Polls: Authoritative on-chain poll state fetched via the indexer
//! - Networks: Chain deployment definitions and connection details
//! - Watchers: Per-address reconciliation loop configuration

mod network;
mod poll;
mod submission;
mod watcher;

pub use network::{IndexerUrl, Network};
pub use poll::{
	DistributionMode, OnChainPollRecord, PollSettings, PollStatus, PoolState, StakePosition,
};
pub use submission::{NewSubmission, PendingSubmission, PrivacyMode, SubmissionStatus, Visibility};
pub use watcher::{NotificationMessage, Watcher, WatcherNotifications};
