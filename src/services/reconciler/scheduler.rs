//! Tick scheduling for the reconciler.
//!
//! Wraps a single spawned timer task behind start, reschedule and stop so a
//! watcher never has more than one active timer. Changing the cadence tears
//! the current timer down and waits out a full new period before the next
//! tick fires.

use std::{future::Future, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::services::reconciler::error::ReconcilerError;

/// Drives a repeating asynchronous tick on a single background task.
///
/// The tick callback runs to completion before the timer is polled again, so
/// ticks never overlap. The callback may return a new period to adjust the
/// cadence from inside a tick; [`IntervalScheduler::reschedule`] adjusts it
/// from outside.
pub struct IntervalScheduler {
	interval_tx: watch::Sender<Duration>,
	shutdown_tx: watch::Sender<bool>,
	join: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
	/// Spawns the timer task and returns a handle controlling it
	///
	/// The first tick fires immediately; later ticks follow the configured
	/// period. A cadence change restarts the wait, so the next tick lands a
	/// full new period after the change.
	///
	/// # Arguments
	/// * `initial` - Period between ticks until the cadence changes
	/// * `tick` - Callback run on every tick; returning `Some(period)`
	///   switches the cadence for subsequent ticks
	pub fn start<F, Fut>(initial: Duration, mut tick: F) -> Self
	where
		F: FnMut() -> Fut + Send + 'static,
		Fut: Future<Output = Option<Duration>> + Send + 'static,
	{
		let (interval_tx, mut interval_rx) = watch::channel(initial);
		let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

		let join = tokio::spawn(async move {
			let mut period = initial;
			let mut first = true;
			loop {
				let mut timer = tokio::time::interval(period);
				timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
				if !first {
					// A fresh interval yields once immediately. Swallow that
					// tick on rebuilds so a cadence change does not fire early.
					timer.tick().await;
				}
				first = false;

				loop {
					tokio::select! {
						_ = shutdown_rx.changed() => {
							return;
						}
						changed = interval_rx.changed() => {
							if changed.is_err() {
								return;
							}
							period = *interval_rx.borrow_and_update();
							break;
						}
						_ = timer.tick() => {
							if let Some(next) = tick().await {
								if next != period {
									period = next;
									break;
								}
							}
						}
					}
				}
			}
		});

		Self {
			interval_tx,
			shutdown_tx,
			join: Some(join),
		}
	}

	/// Replaces the active timer with one using the given period
	///
	/// # Arguments
	/// * `period` - New period between ticks
	///
	/// # Returns
	/// * `Result<(), ReconcilerError>` - Error if the timer task has exited
	pub fn reschedule(&self, period: Duration) -> Result<(), ReconcilerError> {
		self.interval_tx.send(period).map_err(|_| {
			ReconcilerError::scheduler_error("Timer task is no longer running", None, None)
		})
	}

	/// Stops the timer task and waits for it to exit
	///
	/// Any tick already in flight runs to completion first. After this
	/// returns no further ticks fire. Stopping twice is a no-op.
	pub async fn stop(&mut self) -> Result<(), ReconcilerError> {
		let _ = self.shutdown_tx.send(true);
		if let Some(join) = self.join.take() {
			join.await.map_err(|e| {
				ReconcilerError::scheduler_error(
					"Timer task failed to shut down cleanly",
					Some(e.into()),
					None,
				)
			})?;
		}
		Ok(())
	}
}
