//! Platform seams for notification delivery.
//!
//! The broker, registrar and dispatcher never touch the OS directly. They
//! talk to these traits, which the desktop module implements for real and
//! `mock` implements for tests.

use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use crate::types::PermissionState;
use crate::worker::ChannelHandle;

use super::content::{NotificationId, NotificationOptions};
use super::error::NotificationError;

/// What the runtime supports, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// An OS notification facility exists
    pub notifications: bool,
    /// Background workers can be registered
    pub background_workers: bool,
}

impl PlatformCapabilities {
    /// Everything available.
    #[must_use]
    pub fn all() -> Self {
        Self {
            notifications: true,
            background_workers: true,
        }
    }

    /// Nothing available.
    #[must_use]
    pub fn none() -> Self {
        Self {
            notifications: false,
            background_workers: false,
        }
    }

    /// Notifications without background workers.
    #[must_use]
    pub fn foreground_only() -> Self {
        Self {
            notifications: true,
            background_workers: false,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Reads and requests notification permission.
#[allow(async_fn_in_trait)]
pub trait PermissionPrompt {
    /// Reads the current permission without asking the user.
    fn current(&self) -> Result<PermissionState, NotificationError>;

    /// Asks the user and resolves with their decision.
    async fn prompt(&self) -> Result<PermissionState, NotificationError>;
}

/// Registers background workers.
#[allow(async_fn_in_trait)]
pub trait WorkerHost {
    /// Registers the worker at `script_url` controlling `scope`.
    ///
    /// Resolves once the worker is installed and active.
    async fn register(&self, script_url: &Url, scope: &Url)
        -> Result<ChannelHandle, NotificationError>;

    /// Returns true if an active worker controls the foreground.
    fn has_active_controller(&self) -> bool;
}

/// Shows OS-level notifications.
///
/// Shared between the foreground and the background worker, hence
/// `Send + Sync`.
pub trait NotificationSurface: Send + Sync {
    /// Returns true if notifications can be shown right now.
    fn is_available(&self) -> bool;

    /// Shows a notification.
    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<NotificationId, NotificationError>;

    /// Closes a notification shown earlier. Unknown ids are ignored.
    fn close(&self, id: NotificationId);

    /// Routes activations of shown notifications to `clicks`.
    ///
    /// Surfaces that cannot report activations ignore this.
    fn on_click(&self, clicks: mpsc::UnboundedSender<NotificationId>) {
        let _ = clicks;
    }
}

impl<T: PermissionPrompt + ?Sized> PermissionPrompt for Rc<T> {
    fn current(&self) -> Result<PermissionState, NotificationError> {
        (**self).current()
    }

    async fn prompt(&self) -> Result<PermissionState, NotificationError> {
        (**self).prompt().await
    }
}

impl<T: WorkerHost + ?Sized> WorkerHost for Rc<T> {
    async fn register(
        &self,
        script_url: &Url,
        scope: &Url,
    ) -> Result<ChannelHandle, NotificationError> {
        (**self).register(script_url, scope).await
    }

    fn has_active_controller(&self) -> bool {
        (**self).has_active_controller()
    }
}

impl<T: NotificationSurface + ?Sized> NotificationSurface for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<NotificationId, NotificationError> {
        (**self).show(title, options)
    }

    fn close(&self, id: NotificationId) {
        (**self).close(id)
    }

    fn on_click(&self, clicks: mpsc::UnboundedSender<NotificationId>) {
        (**self).on_click(clicks)
    }
}
