//! Timer module.
//!
//! - `engine`: countdown state machine with mode transitions
//! - `scheduler`: re-arming one-shot tick delays with cancel-on-drop
//! - `session`: the mounted foreground timer and its notification pump

pub mod engine;
pub mod scheduler;
pub mod session;

pub use engine::{TickOutcome, TimerEngine, TransitionNotice, LONG_BREAK_EVERY};
pub use scheduler::{TickScheduler, TICK_PERIOD};
pub use session::{Intent, Notifier, TimerSession};
