//! The background worker.
//!
//! Runs on its own task and owns no foreground state. Everything it needs
//! arrives through its port or was handed over at spawn.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::deployment::{AssetDirectory, DeploymentRoot};
use crate::notification::{
    default_icon, NotificationId, NotificationOptions, NotificationSurface,
};

use super::cache::{CacheStorage, CACHE_NAME, PRECACHE_ASSETS};
use super::clients::ClientRegistry;
use super::error::CacheError;
use super::protocol::{ClickOutcome, WorkerEvent, WorkerMessage};

/// Worker state handed over at spawn.
pub struct BackgroundWorker<N, C> {
    root: DeploymentRoot,
    assets: AssetDirectory,
    storage: CacheStorage,
    surface: Arc<N>,
    clients: Arc<C>,
}

impl<N, C> BackgroundWorker<N, C>
where
    N: NotificationSurface + 'static,
    C: ClientRegistry + 'static,
{
    pub fn new(
        root: DeploymentRoot,
        assets: AssetDirectory,
        storage: CacheStorage,
        surface: Arc<N>,
        clients: Arc<C>,
    ) -> Self {
        Self {
            root,
            assets,
            storage,
            surface,
            clients,
        }
    }

    /// Handles events until every port is dropped.
    pub async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<WorkerEvent>,
        mut clicks: mpsc::UnboundedReceiver<NotificationId>,
    ) {
        info!(scope = %self.root, "background worker started");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                Some(id) = clicks.recv() => {
                    self.on_notification_click(id);
                }
            }
        }
        info!("background worker stopped");
    }

    async fn handle(&self, event: WorkerEvent) {
        match event {
            WorkerEvent::Install { reply } => {
                let _ = reply.send(self.install().await);
            }
            WorkerEvent::Activate { reply } => {
                let _ = reply.send(self.activate().await);
            }
            WorkerEvent::Message(value) => {
                self.on_message(&value);
            }
            WorkerEvent::NotificationClick { id, reply } => {
                let _ = reply.send(self.on_notification_click(id));
            }
        }
    }

    /// Precaches the deployment assets into the current cache.
    pub async fn install(&self) -> Result<usize, CacheError> {
        info!("worker installing");
        let cache = self.storage.open(CACHE_NAME).await?;
        cache.add_all(&self.root, &self.assets, &PRECACHE_ASSETS).await
    }

    /// Deletes every cache except the current one.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        info!("worker activating");
        let mut purged = Vec::new();
        for name in self.storage.keys().await? {
            if name != CACHE_NAME && self.storage.delete(&name).await? {
                purged.push(name);
            }
        }
        if !purged.is_empty() {
            debug!(?purged, "stale caches purged");
        }
        Ok(purged)
    }

    /// Handles a posted message. Returns the id of a shown notification.
    pub fn on_message(&self, value: &serde_json::Value) -> Option<NotificationId> {
        debug!(message = %value, "worker received message");
        let Some(WorkerMessage::ShowNotification { title, body, icon }) =
            WorkerMessage::parse(value)
        else {
            return None;
        };

        let icon = icon.unwrap_or_else(|| default_icon(&self.root));
        let options = NotificationOptions::persistent(body.as_deref().unwrap_or(""), &icon);
        match self.surface.show(&title, &options) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("worker could not show notification: {}", e);
                None
            }
        }
    }

    /// Closes the notification, then focuses a same-origin client or
    /// opens a new one at the root.
    pub fn on_notification_click(&self, id: NotificationId) -> ClickOutcome {
        debug!(%id, "notification clicked");
        self.surface.close(id);

        for client in self.clients.match_all() {
            if self.root.same_origin(&client.url) {
                return match self.clients.focus(client.id) {
                    Ok(()) => ClickOutcome::Focused(client.id),
                    Err(e) => {
                        warn!("could not focus client: {}", e);
                        ClickOutcome::Nothing
                    }
                };
            }
        }

        match self.clients.open_window(self.root.as_url()) {
            Ok(()) => ClickOutcome::Opened(self.root.as_url().clone()),
            Err(e) => {
                warn!("could not open client: {}", e);
                ClickOutcome::Nothing
            }
        }
    }
}
