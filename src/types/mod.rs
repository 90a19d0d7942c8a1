//! Core data types for the interval timer.
//!
//! This module defines the data structures used for:
//! - Timer mode and state snapshots
//! - Timer configuration with validation
//! - Notification permission state
//! - Notification requests handed to the dispatcher

use serde::{Deserialize, Serialize};

// ============================================================================
// Mode
// ============================================================================

/// The kind of interval currently being counted down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// A focused work interval
    #[default]
    Focus,
    /// A short break between focus intervals
    ShortBreak,
    /// A long break after every fourth focus interval
    LongBreak,
}

impl Mode {
    /// All modes, in display order.
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short",
            Mode::LongBreak => "Long",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" | "pomodoro" | "work" => Ok(Mode::Focus),
            "short" | "short_break" | "shortbreak" => Ok(Mode::ShortBreak),
            "long" | "long_break" | "longbreak" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Nominal interval lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    /// Focus duration in minutes (1-120)
    pub work_minutes: u32,
    /// Short break duration in minutes (1-60)
    pub break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
        }
    }
}

impl PomodoroConfig {
    /// Creates a new configuration with the specified focus duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns the nominal duration of `mode` in seconds.
    pub fn nominal_duration(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Focus => self.work_minutes,
            Mode::ShortBreak => self.break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        minutes * 60
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_minutes < 1 || self.work_minutes > 120 {
            return Err("focus duration must be between 1 and 120 minutes".to_string());
        }
        if self.break_minutes < 1 || self.break_minutes > 60 {
            return Err("short break duration must be between 1 and 60 minutes".to_string());
        }
        if self.long_break_minutes < 1 || self.long_break_minutes > 60 {
            return Err("long break duration must be between 1 and 60 minutes".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Read-only snapshot of the timer, as handed to the presentation layer.
///
/// `remaining_seconds` always lies in `[0, nominal_duration(mode)]`, and
/// `is_running` is false whenever `remaining_seconds` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: Mode,
    /// Remaining seconds in the current mode
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the countdown is active
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    /// Number of completed focus intervals this session
    #[serde(rename = "completedFocusCycles")]
    pub completed_focus_cycles: u32,
}

impl TimerState {
    /// Creates the initial state: focus mode, full duration, stopped.
    pub fn new(config: &PomodoroConfig) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_seconds: config.nominal_duration(Mode::Focus),
            is_running: false,
            completed_focus_cycles: 0,
        }
    }

    /// Returns true if a tick would decrement the countdown.
    pub fn can_tick(&self) -> bool {
        self.is_running && self.remaining_seconds > 0
    }
}

// ============================================================================
// PermissionState
// ============================================================================

/// Outcome of the platform's notification-permission negotiation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Not read yet
    #[default]
    Unknown,
    /// The user has not decided
    Default,
    /// Notifications are allowed
    Granted,
    /// Notifications are blocked
    Denied,
}

impl PermissionState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Unknown => "unknown",
            PermissionState::Default => "default",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }

    /// Returns true if notifications may be shown.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

// ============================================================================
// NotificationRequest
// ============================================================================

/// A single notification to deliver; built per dispatch and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Notification title
    pub title: String,
    /// Notification body text
    pub body: String,
    /// Icon URL resolved against the deployment root
    #[serde(rename = "iconPath")]
    pub icon_path: String,
}

impl NotificationRequest {
    /// Creates a new request.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        icon_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon_path: icon_path.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
