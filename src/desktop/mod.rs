//! Desktop implementations of the notification platform traits.
//!
//! - `notifier`: `NotificationSurface` backed by the desktop notification
//!   daemon
//! - `prompt`: `PermissionPrompt` answered on the terminal

pub mod notifier;
pub mod prompt;

pub use notifier::{tag_id, DesktopNotifier, APP_NAME};
pub use prompt::TerminalPermissionPrompt;
