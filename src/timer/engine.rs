//! Timer engine for focus/break cycles.
//!
//! This module provides the countdown state machine:
//! - Mode switching and reset (always leaves the timer stopped)
//! - One-second ticks driven by the caller
//! - Completion transitions (Focus → short/long break → Focus)
//! - A transition notice per completion for the notification layer
//! - Read-only state snapshots after every transition

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::types::{Mode, PomodoroConfig, TimerState};

/// Every fourth completed focus interval earns a long break.
pub const LONG_BREAK_EVERY: u32 = 4;

// ============================================================================
// TransitionNotice
// ============================================================================

/// Describes a completed interval; sent once per completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionNotice {
    /// Mode that just finished
    pub from: Mode,
    /// Mode the engine switched to
    pub next: Mode,
    /// Focus cycles completed so far, including this one
    pub completed_focus_cycles: u32,
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
}

impl TransitionNotice {
    fn describe(from: Mode, next: Mode, completed_focus_cycles: u32) -> Self {
        let (title, body) = match from {
            Mode::Focus => (
                "Pomodoro completed!",
                format!(
                    "Time for a break. You have completed {} pomodoros.",
                    completed_focus_cycles
                ),
            ),
            Mode::ShortBreak => ("Break completed!", "Time to focus.".to_string()),
            Mode::LongBreak => (
                "Break completed!",
                "Long break complete. Ready for a new session?".to_string(),
            ),
        };

        Self {
            from,
            next,
            completed_focus_cycles,
            title: title.to_string(),
            body,
        }
    }
}

// ============================================================================
// TickOutcome
// ============================================================================

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was stopped or already at zero; nothing changed
    Idle,
    /// One second was consumed
    Counting {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The interval finished and the engine moved to the next mode
    Completed(TransitionNotice),
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine.
///
/// The engine does no scheduling of its own; `tick()` is called once per
/// second by [`TickScheduler`](super::TickScheduler).
pub struct TimerEngine {
    /// Nominal durations
    config: PomodoroConfig,
    /// Current timer state
    state: TimerState,
    /// Completion notices for the notification layer
    notice_tx: mpsc::UnboundedSender<TransitionNotice>,
    /// Snapshot publisher for the presentation layer
    snapshot_tx: watch::Sender<TimerState>,
}

impl TimerEngine {
    /// Creates an engine in its initial state (focus, full duration, stopped).
    pub fn new(config: PomodoroConfig, notice_tx: mpsc::UnboundedSender<TransitionNotice>) -> Self {
        let state = TimerState::new(&config);
        let (snapshot_tx, _) = watch::channel(state.clone());

        Self {
            config,
            state,
            notice_tx,
            snapshot_tx,
        }
    }

    /// Returns a receiver that observes a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.snapshot_tx.subscribe()
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// Switches to `mode`, discarding any in-progress countdown.
    pub fn set_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.state.remaining_seconds = self.config.nominal_duration(mode);
        self.state.is_running = false;

        debug!(mode = mode.as_str(), "mode set");
        self.publish();
    }

    /// Starts or pauses the countdown.
    ///
    /// Has no effect while the remaining time is zero.
    pub fn toggle(&mut self) {
        if self.state.remaining_seconds == 0 {
            debug!("toggle ignored at zero remaining");
            return;
        }

        self.state.is_running = !self.state.is_running;

        debug!(running = self.state.is_running, "toggled");
        self.publish();
    }

    /// Restores the full duration of the current mode and stops.
    pub fn reset(&mut self) {
        self.state.remaining_seconds = self.config.nominal_duration(self.state.mode);
        self.state.is_running = false;

        debug!(mode = self.state.mode.as_str(), "reset");
        self.publish();
    }

    /// Consumes one second.
    ///
    /// Reaching zero while running runs the completion transition in the
    /// same call.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.can_tick() {
            return TickOutcome::Idle;
        }

        self.state.remaining_seconds -= 1;

        if self.state.remaining_seconds == 0 {
            return TickOutcome::Completed(self.complete());
        }

        self.publish();
        TickOutcome::Counting {
            remaining_seconds: self.state.remaining_seconds,
        }
    }

    /// Handles interval completion.
    fn complete(&mut self) -> TransitionNotice {
        self.state.is_running = false;

        let from = self.state.mode;
        let next = match from {
            Mode::Focus => {
                self.state.completed_focus_cycles += 1;
                if self.state.completed_focus_cycles % LONG_BREAK_EVERY == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        };

        let notice = TransitionNotice::describe(from, next, self.state.completed_focus_cycles);
        info!(
            from = from.as_str(),
            next = next.as_str(),
            cycles = self.state.completed_focus_cycles,
            "interval completed"
        );

        if self.notice_tx.send(notice.clone()).is_err() {
            warn!("notification channel closed; completion notice dropped");
        }

        self.set_mode(next);
        notice
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.clone());
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
