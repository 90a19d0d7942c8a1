//! Notification delivery.
//!
//! - `PermissionBroker` tracks and requests notification permission
//! - `BackgroundChannelRegistrar` registers the background worker under the
//!   deployment root
//! - `NotificationDispatcher` plays the audio cue and picks a delivery tier
//!
//! Platform access goes through the traits in `platform`; `mock` holds the
//! in-memory fakes used by the tests.
//!
//! # Example
//!
//! ```rust,ignore
//! let broker = Rc::new(PermissionBroker::new(prompt, capabilities));
//! broker.mount();
//! let registrar = Rc::new(BackgroundChannelRegistrar::new(host, capabilities, location));
//! registrar.register(WORKER_SCRIPT).await;
//!
//! let dispatcher = NotificationDispatcher::new(broker, registrar, surface, sound, config);
//! dispatcher.send("Pomodoro completed!", "Time for a break.").await;
//! ```

mod content;
mod dispatcher;
pub mod error;
pub mod mock;
mod permission;
mod platform;
mod registrar;

pub use self::content::{
    default_icon, sanitize_text, NotificationId, NotificationOptions, NotificationOptionsBuilder,
    FALLBACK_AUTO_CLOSE, ICON_ASSET, NOTIFICATION_TAG, VIBRATE_PATTERN,
};
pub use self::dispatcher::{
    DeliveryOutcome, DeliveryTier, DispatcherConfig, NotificationDispatcher, SkipReason,
};
pub use self::error::NotificationError;
pub use self::mock::{MockNotificationSurface, MockPermissionPrompt, MockWorkerHost};
pub use self::permission::PermissionBroker;
pub use self::platform::{NotificationSurface, PermissionPrompt, PlatformCapabilities, WorkerHost};
pub use self::registrar::BackgroundChannelRegistrar;
