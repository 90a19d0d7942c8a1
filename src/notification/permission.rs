//! Notification permission tracking.

use std::cell::Cell;

use tracing::{debug, warn};

use crate::types::PermissionState;

use super::platform::{PermissionPrompt, PlatformCapabilities};

/// Requests and tracks notification permission.
///
/// The stored state is what the last resolved request returned. When
/// requests overlap, whichever settles last wins.
pub struct PermissionBroker<P> {
    prompt: P,
    capabilities: PlatformCapabilities,
    state: Cell<PermissionState>,
}

impl<P: PermissionPrompt> PermissionBroker<P> {
    /// Creates a broker in the `Unknown` state. Call [`mount`](Self::mount)
    /// to read the platform state.
    pub fn new(prompt: P, capabilities: PlatformCapabilities) -> Self {
        Self {
            prompt,
            capabilities,
            state: Cell::new(PermissionState::Unknown),
        }
    }

    /// Best-effort read of the current permission. Never prompts.
    pub fn mount(&self) -> PermissionState {
        if !self.capabilities.notifications {
            debug!("notifications unsupported, permission stays unknown");
            return self.state.get();
        }
        match self.prompt.current() {
            Ok(state) => self.store(state),
            Err(e) => debug!("could not read notification permission: {}", e),
        }
        self.state.get()
    }

    /// Returns the last known state.
    pub fn current_state(&self) -> PermissionState {
        self.state.get()
    }

    /// Asks the user for permission.
    ///
    /// Always prompts, even after an earlier denial. Without a
    /// notification facility this resolves to `Denied` without prompting.
    pub async fn request_permission(&self) -> PermissionState {
        if !self.capabilities.notifications {
            warn!("notifications are not supported on this platform");
            return PermissionState::Denied;
        }

        match self.prompt.prompt().await {
            Ok(state) => {
                self.store(state);
                debug!(permission = state.as_str(), "permission request resolved");
                state
            }
            Err(e) => {
                warn!("permission request failed: {}", e);
                self.state.get()
            }
        }
    }

    /// Asks once when the view mounts, unless permission is already
    /// granted or notifications are unsupported.
    pub async fn request_on_mount(&self) -> PermissionState {
        let current = self.state.get();
        if !self.capabilities.notifications || current.is_granted() {
            return current;
        }
        self.request_permission().await
    }

    /// The only writer of `state`.
    fn store(&self, next: PermissionState) {
        let current = self.state.get();
        if current == PermissionState::Granted && next == PermissionState::Unknown {
            return;
        }
        self.state.set(next);
    }
}
