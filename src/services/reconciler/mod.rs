//! Pending-submission reconciliation implementation.
//!
//! Provides the polling side of the service: a repeating timer per watcher
//! that fetches the on-chain poll listing, pairs it against the local
//! working set and resolves each submission as confirmed or failed.
//! - IntervalScheduler for single-timer tick scheduling
//! - WatcherReconciler driving the loop for one watcher
//! - ReconcilerService coordinating all configured watchers
//! - reconcile_once for one-shot sweeps without a timer

mod error;
mod scheduler;
mod service;

pub use error::ReconcilerError;
pub use scheduler::IntervalScheduler;
pub use service::{reconcile_once, ReconcilerService, WatcherReconciler};
