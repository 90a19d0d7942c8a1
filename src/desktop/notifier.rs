//! Desktop notifications via `notify-rust`.
//!
//! Shown notifications are tracked by their daemon id until they are closed,
//! either by [`NotificationSurface::close`] or by the daemon.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use notify_rust::{Notification, Timeout};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::deployment::{AssetDirectory, DeploymentRoot};
use crate::notification::{
    NotificationError, NotificationId, NotificationOptions, NotificationSurface,
};

/// Application name reported to the notification daemon.
pub const APP_NAME: &str = "focusbell";

/// Themed icon used when the deployment icon has no local file.
const FALLBACK_ICON: &str = "alarm-clock";

/// Action reported by the daemon when the body is activated.
const DEFAULT_ACTION: &str = "default";

/// Pseudo-action `notify-rust` reports once the notification is gone.
const CLOSED_ACTION: &str = "__closed";

/// A notification still open on the daemon.
#[derive(Debug, Clone)]
struct Shown {
    daemon_id: u32,
    notification: Notification,
}

type Tracked = Arc<Mutex<HashMap<NotificationId, Shown>>>;

/// Shows notifications through the desktop notification daemon.
#[derive(Debug)]
pub struct DesktopNotifier {
    root: DeploymentRoot,
    assets: Option<AssetDirectory>,
    clicks: Mutex<Option<mpsc::UnboundedSender<NotificationId>>>,
    tracked: Tracked,
}

impl DesktopNotifier {
    pub fn new(root: DeploymentRoot, assets: Option<AssetDirectory>) -> Self {
        Self {
            root,
            assets,
            clicks: Mutex::new(None),
            tracked: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns true if a notification daemon answers.
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn detect() -> bool {
        match notify_rust::get_server_information() {
            Ok(info) => {
                debug!(server = %info.name, "notification daemon found");
                true
            }
            Err(e) => {
                debug!("no notification daemon: {}", e);
                false
            }
        }
    }

    /// Returns true if a notification daemon answers.
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    pub fn detect() -> bool {
        true
    }

    /// Maps the icon URL to a local file, or the themed fallback icon.
    fn icon_for(&self, icon: &str) -> String {
        let local = Url::parse(icon)
            .ok()
            .and_then(|url| self.assets.as_ref()?.local_path(&self.root, &url))
            .filter(|path| path.is_file());
        match local {
            Some(path) => path.to_string_lossy().into_owned(),
            None => FALLBACK_ICON.to_string(),
        }
    }

    fn timeout_for(options: &NotificationOptions) -> Timeout {
        match options.auto_close {
            Some(after) => Timeout::Milliseconds(after.as_millis().min(u32::MAX as u128) as u32),
            None if options.require_interaction => Timeout::Never,
            None => Timeout::Default,
        }
    }

    /// Records an open notification. A tagged notification that reuses a
    /// daemon id replaces the earlier entry.
    #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
    fn track(&self, id: NotificationId, shown: Shown) {
        if let Ok(mut tracked) = self.tracked.lock() {
            tracked.retain(|_, open| open.daemon_id != shown.daemon_id);
            tracked.insert(id, shown);
        }
    }

    fn forget(&self, id: NotificationId) -> Option<Shown> {
        forget(&self.tracked, id)
    }

    #[cfg(test)]
    fn is_tracked(&self, id: NotificationId) -> bool {
        self.tracked
            .lock()
            .is_ok_and(|tracked| tracked.contains_key(&id))
    }
}

fn forget(tracked: &Tracked, id: NotificationId) -> Option<Shown> {
    tracked.lock().ok().and_then(|mut tracked| tracked.remove(&id))
}

/// Handles an action reported for notification `id`.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn on_action(
    action: &str,
    id: NotificationId,
    tracked: &Tracked,
    clicks: Option<&mpsc::UnboundedSender<NotificationId>>,
) {
    match action {
        DEFAULT_ACTION => {
            if let Some(clicks) = clicks {
                let _ = clicks.send(id);
            }
        }
        CLOSED_ACTION => {
            forget(tracked, id);
            debug!(%id, "notification closed by the daemon");
        }
        other => debug!(%id, action = other, "ignored notification action"),
    }
}

/// Closes a notification still open on the daemon.
///
/// `notify-rust` only closes through a handle, so the same content is shown
/// again under the open id and the returned handle is closed.
#[cfg(all(unix, not(target_os = "macos")))]
fn close_on_daemon(shown: Shown) {
    let mut notification = shown.notification;
    match notification.id(shown.daemon_id).show() {
        Ok(handle) => handle.close(),
        Err(e) => warn!("could not close notification {}: {}", shown.daemon_id, e),
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn close_on_daemon(shown: Shown) {
    debug!(daemon_id = shown.daemon_id, "platform closes notifications itself");
}

/// Stable numeric id for a tag so tagged notifications replace each other.
pub fn tag_id(tag: &str) -> u32 {
    // FNV-1a
    let hash = tag
        .bytes()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
    hash.max(1)
}

impl NotificationSurface for DesktopNotifier {
    fn is_available(&self) -> bool {
        true
    }

    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<NotificationId, NotificationError> {
        let id = NotificationId::new();
        let icon = self.icon_for(&options.icon);

        let mut notification = Notification::new();
        notification
            .summary(title)
            .body(&options.body)
            .appname(APP_NAME)
            .icon(&icon)
            .timeout(Self::timeout_for(options));

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            use notify_rust::Urgency;

            if options.renotify {
                notification.id(tag_id(&options.tag));
            }
            if options.require_interaction {
                notification.urgency(Urgency::Critical);
            }
            notification.action(DEFAULT_ACTION, "Open");

            let handle = notification
                .show()
                .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
            self.track(
                id,
                Shown {
                    daemon_id: handle.id(),
                    notification: notification.clone(),
                },
            );

            let clicks = self.clicks.lock().ok().and_then(|slot| slot.clone());
            let tracked = Arc::clone(&self.tracked);
            std::thread::spawn(move || {
                handle.wait_for_action(|action| on_action(action, id, &tracked, clicks.as_ref()));
            });
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        debug!(%id, title, "desktop notification shown");
        Ok(id)
    }

    fn close(&self, id: NotificationId) {
        match self.forget(id) {
            Some(shown) => {
                debug!(%id, daemon_id = shown.daemon_id, "closing notification");
                close_on_daemon(shown);
            }
            None => debug!(%id, "notification already closed"),
        }
    }

    fn on_click(&self, clicks: mpsc::UnboundedSender<NotificationId>) {
        match self.clicks.lock() {
            Ok(mut slot) => *slot = Some(clicks),
            Err(e) => warn!("could not route notification clicks: {}", e),
        }
    }
}
