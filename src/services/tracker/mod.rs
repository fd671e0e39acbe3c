//! Pending-submission tracking implementation.
//!
//! Provides functionality to record poll-creation intents the moment a
//! wallet signs them and to shepherd each record through its lifecycle:
//! the in-memory working set, the durable store client backing it, and
//! the transitions that resolve a record as confirmed or failed.

mod error;
mod ledger;
mod service;
mod storage;
mod transition;

pub use error::TrackerError;
pub use ledger::SubmissionLedger;
pub use service::SubmissionTracker;
pub use storage::{HttpPendingStore, PendingStore};
pub use transition::StateTransitioner;
