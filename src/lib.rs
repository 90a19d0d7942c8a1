//! focusbell library
//!
//! Interval timer core plus the notification delivery stack:
//! - Timer engine, tick scheduler and the mounted session
//! - Permission broker, background channel registrar and dispatcher
//! - Background worker with versioned asset caches
//! - Desktop notification surface and terminal permission prompt
//! - Audio cue playback
//! - CLI command parsing and display utilities

pub mod cli;
pub mod deployment;
pub mod desktop;
pub mod notification;
pub mod sound;
pub mod timer;
pub mod types;
pub mod worker;

// Re-export commonly used types for convenience
pub use types::{Mode, NotificationRequest, PermissionState, PomodoroConfig, TimerState};

pub use deployment::{AssetDirectory, DeploymentError, DeploymentRoot};

pub use timer::{Intent, Notifier, TickOutcome, TimerEngine, TimerSession, TransitionNotice};

pub use notification::{
    BackgroundChannelRegistrar, DeliveryOutcome, DeliveryTier, DispatcherConfig,
    MockNotificationSurface, MockPermissionPrompt, MockWorkerHost, NotificationDispatcher,
    NotificationError, NotificationSurface, PermissionBroker, PermissionPrompt,
    PlatformCapabilities, SkipReason, WorkerHost,
};

pub use worker::{ChannelHandle, LocalWorkerHost, WorkerMessage, WORKER_SCRIPT};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
