//! Foreground ↔ worker message protocol.
//!
//! The worker is reachable only through its port. Lifecycle events carry a
//! oneshot reply; posted messages are plain JSON values and get none.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use url::Url;
use uuid::Uuid;

use crate::notification::{NotificationError, NotificationId};
use crate::types::NotificationRequest;

use super::error::CacheError;

/// Message type the worker turns into a notification.
pub const SHOW_NOTIFICATION: &str = "SHOW_NOTIFICATION";

/// Messages the foreground posts to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    #[serde(rename = "SHOW_NOTIFICATION")]
    ShowNotification {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
}

impl WorkerMessage {
    /// Builds the SHOW_NOTIFICATION message for a request.
    #[must_use]
    pub fn show(request: &NotificationRequest) -> Self {
        Self::ShowNotification {
            title: request.title.clone(),
            body: Some(request.body.clone()),
            icon: Some(request.icon_path.clone()),
        }
    }

    /// Parses a posted value. Unknown or malformed messages yield `None`.
    #[must_use]
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// What a notification click led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An existing client was focused
    Focused(Uuid),
    /// A new client was opened at this URL
    Opened(Url),
    /// Neither was possible
    Nothing,
}

/// Events delivered to the worker's port.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Precache the deployment; replies with the number of cached assets.
    Install {
        reply: oneshot::Sender<Result<usize, CacheError>>,
    },
    /// Purge stale caches; replies with the purged cache names.
    Activate {
        reply: oneshot::Sender<Result<Vec<String>, CacheError>>,
    },
    /// A posted message.
    Message(serde_json::Value),
    /// A notification was activated by the user.
    NotificationClick {
        id: NotificationId,
        reply: oneshot::Sender<ClickOutcome>,
    },
}

/// Reference to a registered worker.
///
/// Cloning shares the same port.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    id: Uuid,
    script_url: Url,
    scope: Url,
    port: mpsc::UnboundedSender<WorkerEvent>,
}

impl ChannelHandle {
    pub fn new(script_url: Url, scope: Url, port: mpsc::UnboundedSender<WorkerEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            script_url,
            scope,
            port,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn script_url(&self) -> &Url {
        &self.script_url
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    /// Returns true once the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.port.is_closed()
    }

    /// Posts a message to the worker.
    ///
    /// # Errors
    ///
    /// Returns `SendFailed` if the worker has stopped.
    pub fn post(&self, message: &WorkerMessage) -> Result<(), NotificationError> {
        let value = serde_json::to_value(message)
            .map_err(|e| NotificationError::InvalidInput(e.to_string()))?;
        self.post_value(value)
    }

    /// Posts a raw JSON value to the worker.
    pub fn post_value(&self, value: serde_json::Value) -> Result<(), NotificationError> {
        self.send(WorkerEvent::Message(value))
    }

    /// Runs the install step and waits for it.
    pub async fn install(&self) -> Result<usize, NotificationError> {
        let (reply, rx) = oneshot::channel();
        self.send(WorkerEvent::Install { reply })?;
        rx.await
            .map_err(|_| gone())?
            .map_err(|e| NotificationError::RegistrationFailed(format!("install failed: {e}")))
    }

    /// Runs the activate step and waits for it.
    pub async fn activate(&self) -> Result<Vec<String>, NotificationError> {
        let (reply, rx) = oneshot::channel();
        self.send(WorkerEvent::Activate { reply })?;
        rx.await
            .map_err(|_| gone())?
            .map_err(|e| NotificationError::RegistrationFailed(format!("activate failed: {e}")))
    }

    /// Reports a click on notification `id` and waits for the outcome.
    pub async fn notification_click(
        &self,
        id: NotificationId,
    ) -> Result<ClickOutcome, NotificationError> {
        let (reply, rx) = oneshot::channel();
        self.send(WorkerEvent::NotificationClick { id, reply })?;
        rx.await.map_err(|_| gone())
    }

    fn send(&self, event: WorkerEvent) -> Result<(), NotificationError> {
        self.port.send(event).map_err(|_| gone())
    }
}

fn gone() -> NotificationError {
    NotificationError::SendFailed("background worker has stopped".to_string())
}
