//! Window clients the worker can focus or open.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use super::error::ClientError;

/// A foreground view controlled by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: Uuid,
    pub url: Url,
}

/// Requests the worker sends to foreground sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Bring this client to the front
    Focus(Uuid),
    /// Open a new view at this URL
    Open(Url),
}

/// Registry of window clients.
pub trait ClientRegistry: Send + Sync {
    /// Lists the window clients.
    fn match_all(&self) -> Vec<WindowClient>;

    /// Focuses client `id`.
    fn focus(&self, id: Uuid) -> Result<(), ClientError>;

    /// Opens a new window at `url`.
    fn open_window(&self, url: &Url) -> Result<(), ClientError>;
}

/// Terminal sessions attached to this process.
///
/// Focus and open requests are forwarded as [`ClientEvent`]s for the
/// session loop to render.
#[derive(Debug)]
pub struct SessionClients {
    clients: Mutex<Vec<WindowClient>>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl SessionClients {
    pub fn new(events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self {
            clients: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Registers a session at `url` and returns its id.
    pub fn attach(&self, url: Url) -> Uuid {
        let id = Uuid::new_v4();
        if let Ok(mut clients) = self.clients.lock() {
            clients.push(WindowClient { id, url });
        }
        debug!(%id, "client attached");
        id
    }

    /// Removes a session.
    pub fn detach(&self, id: Uuid) {
        if let Ok(mut clients) = self.clients.lock() {
            clients.retain(|c| c.id != id);
        }
    }
}

impl ClientRegistry for SessionClients {
    fn match_all(&self) -> Vec<WindowClient> {
        self.clients
            .lock()
            .map(|clients| clients.clone())
            .unwrap_or_default()
    }

    fn focus(&self, id: Uuid) -> Result<(), ClientError> {
        if !self.match_all().iter().any(|c| c.id == id) {
            return Err(ClientError::NotFound(id.to_string()));
        }
        self.events
            .send(ClientEvent::Focus(id))
            .map_err(|_| ClientError::Disconnected)
    }

    fn open_window(&self, url: &Url) -> Result<(), ClientError> {
        info!("opening {}", url);
        self.events
            .send(ClientEvent::Open(url.clone()))
            .map_err(|_| ClientError::Disconnected)
    }
}

/// Mock client registry for testing.
#[derive(Debug, Default)]
pub struct MockClientRegistry {
    clients: Mutex<Vec<WindowClient>>,
    focused: Mutex<Vec<Uuid>>,
    opened: Mutex<Vec<Url>>,
}

impl MockClientRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client at `url`.
    pub fn add_client(&self, url: Url) -> Uuid {
        let id = Uuid::new_v4();
        if let Ok(mut clients) = self.clients.lock() {
            clients.push(WindowClient { id, url });
        }
        id
    }

    #[must_use]
    pub fn focused(&self) -> Vec<Uuid> {
        self.focused.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ClientRegistry for MockClientRegistry {
    fn match_all(&self) -> Vec<WindowClient> {
        self.clients.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn focus(&self, id: Uuid) -> Result<(), ClientError> {
        if let Ok(mut focused) = self.focused.lock() {
            focused.push(id);
        }
        Ok(())
    }

    fn open_window(&self, url: &Url) -> Result<(), ClientError> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.clone());
        }
        Ok(())
    }
}
