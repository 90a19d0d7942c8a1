//! Mounted timer view.
//!
//! A `TimerSession` is the foreground side of the timer: it owns the engine,
//! the tick scheduler and the task that forwards completion notices to the
//! notification layer. The presentation layer only sees read-only snapshots
//! and the three intents.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

use crate::types::{Mode, PomodoroConfig, TimerState};

use super::engine::{TimerEngine, TransitionNotice};
use super::scheduler::TickScheduler;

/// Receives completion notices from a mounted session.
///
/// Each notice is handled on its own local task, so a slow implementation
/// never holds up the countdown.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Delivers the alert for a finished interval.
    async fn notify(&self, notice: &TransitionNotice);
}

/// User intents accepted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Switch mode, discarding progress
    SetMode(Mode),
    /// Start or pause
    Toggle,
    /// Restore the full duration of the current mode
    Reset,
}

/// A mounted timer.
///
/// Must be created and used inside a [`tokio::task::LocalSet`].
pub struct TimerSession {
    engine: Rc<RefCell<TimerEngine>>,
    ticker: TickScheduler,
    pump: JoinHandle<()>,
}

impl TimerSession {
    /// Mounts a new session whose completion notices go to `notifier`.
    pub fn mount<N: Notifier + 'static>(config: PomodoroConfig, notifier: Rc<N>) -> Self {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let engine = Rc::new(RefCell::new(TimerEngine::new(config, notice_tx)));
        let pump = tokio::task::spawn_local(pump_notices(notice_rx, notifier));

        debug!("timer session mounted");
        Self {
            engine,
            ticker: TickScheduler::new(),
            pump,
        }
    }

    /// Replaces the tick period (used by tests and demos).
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.ticker = TickScheduler::with_period(period);
        self.sync_ticker();
        self
    }

    /// Returns the current state.
    pub fn snapshot(&self) -> TimerState {
        self.engine.borrow().get_state().clone()
    }

    /// Returns a receiver that sees a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.engine.borrow().subscribe()
    }

    /// Switches mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.apply(Intent::SetMode(mode));
    }

    /// Starts or pauses the countdown.
    pub fn toggle(&mut self) {
        self.apply(Intent::Toggle);
    }

    /// Resets the current mode.
    pub fn reset(&mut self) {
        self.apply(Intent::Reset);
    }

    /// Applies an intent and re-arms or cancels the pending tick.
    pub fn apply(&mut self, intent: Intent) {
        {
            let mut engine = self.engine.borrow_mut();
            match intent {
                Intent::SetMode(mode) => engine.set_mode(mode),
                Intent::Toggle => engine.toggle(),
                Intent::Reset => engine.reset(),
            }
        }
        self.sync_ticker();
    }

    fn sync_ticker(&mut self) {
        let can_tick = self.engine.borrow().get_state().can_tick();
        if can_tick {
            self.ticker.arm(Rc::clone(&self.engine));
        } else {
            self.ticker.cancel();
        }
    }
}

impl Drop for TimerSession {
    fn drop(&mut self) {
        self.pump.abort();
        debug!("timer session unmounted");
    }
}

async fn pump_notices<N: Notifier + 'static>(
    mut notice_rx: mpsc::UnboundedReceiver<TransitionNotice>,
    notifier: Rc<N>,
) {
    while let Some(notice) = notice_rx.recv().await {
        let notifier = Rc::clone(&notifier);
        tokio::task::spawn_local(async move {
            notifier.notify(&notice).await;
        });
    }
}
