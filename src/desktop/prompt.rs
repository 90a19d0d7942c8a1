//! Terminal permission prompt.
//!
//! The session loop owns the terminal: it renders the question when
//! [`TerminalPermissionPrompt::asked`] fires and forwards the user's `y`/`n`
//! through [`TerminalPermissionPrompt::answer`].

use std::cell::{Cell, RefCell};

use tokio::sync::{oneshot, Notify};
use tracing::debug;

use crate::notification::{NotificationError, PermissionPrompt};
use crate::types::PermissionState;

/// Asks for notification permission on the terminal.
#[derive(Debug, Default)]
pub struct TerminalPermissionPrompt {
    decision: Cell<PermissionState>,
    pending: RefCell<Option<oneshot::Sender<PermissionState>>>,
    asking: Notify,
}

impl TerminalPermissionPrompt {
    /// Starts undecided, or granted when `pre_granted` is set.
    pub fn new(pre_granted: bool) -> Self {
        let decision = if pre_granted {
            PermissionState::Granted
        } else {
            PermissionState::Default
        };
        Self {
            decision: Cell::new(decision),
            pending: RefCell::new(None),
            asking: Notify::new(),
        }
    }

    /// Resolves when a new question needs to be shown.
    pub async fn asked(&self) {
        self.asking.notified().await;
    }

    /// Returns true while a prompt waits for an answer.
    pub fn has_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Answers the pending prompt. Returns false if none was pending.
    pub fn answer(&self, allow: bool) -> bool {
        let Some(tx) = self.pending.borrow_mut().take() else {
            return false;
        };
        let state = if allow {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        tx.send(state).is_ok()
    }
}

impl PermissionPrompt for TerminalPermissionPrompt {
    fn current(&self) -> Result<PermissionState, NotificationError> {
        Ok(self.decision.get())
    }

    async fn prompt(&self) -> Result<PermissionState, NotificationError> {
        let (tx, rx) = oneshot::channel();
        if self.pending.replace(Some(tx)).is_some() {
            debug!("earlier permission prompt superseded");
        }
        self.asking.notify_one();

        // A superseded prompt resolves as undecided.
        let state = rx.await.unwrap_or(PermissionState::Default);
        if state != PermissionState::Default {
            self.decision.set(state);
        }
        Ok(state)
    }
}
