//! Tick scheduling.
//!
//! Ticks are driven by a chain of one-shot delays: every firing sleeps a
//! fresh period before the next tick instead of following a fixed-rate
//! interval. Drift between ticks is not compensated.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

use super::engine::{TickOutcome, TimerEngine};

/// Delay between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the pending tick task of a mounted timer.
///
/// Dropping the scheduler cancels the pending tick, so a torn-down view is
/// never ticked again.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Creates a scheduler with the standard one-second period.
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            pending: None,
        }
    }

    /// Returns true while a tick is scheduled.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Schedules ticks for `engine` until it stops running.
    ///
    /// Must be called from within a [`tokio::task::LocalSet`]. Does nothing
    /// if a tick is already pending.
    pub fn arm(&mut self, engine: Rc<RefCell<TimerEngine>>) {
        if self.is_armed() {
            return;
        }

        let period = self.period;
        self.pending = Some(tokio::task::spawn_local(async move {
            loop {
                tokio::time::sleep(period).await;

                let outcome = engine.borrow_mut().tick();
                match outcome {
                    TickOutcome::Counting { .. } => {}
                    TickOutcome::Completed(_) | TickOutcome::Idle => break,
                }
            }
            debug!("tick chain finished");
        }));
    }

    /// Cancels the pending tick, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("pending tick cancelled");
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
