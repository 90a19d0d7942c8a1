//! In-process worker host.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use url::Url;

use crate::deployment::{AssetDirectory, DeploymentRoot};
use crate::notification::{NotificationError, NotificationSurface, WorkerHost};

use super::cache::CacheStorage;
use super::clients::ClientRegistry;
use super::protocol::ChannelHandle;
use super::service::BackgroundWorker;

/// Runs registered workers as tokio tasks in this process.
///
/// Registering again replaces the previous worker.
pub struct LocalWorkerHost<N, C> {
    assets: AssetDirectory,
    storage: CacheStorage,
    surface: Arc<N>,
    clients: Arc<C>,
    controller: AtomicBool,
    running: RefCell<Option<JoinHandle<()>>>,
}

impl<N, C> LocalWorkerHost<N, C>
where
    N: NotificationSurface + 'static,
    C: ClientRegistry + 'static,
{
    pub fn new(
        assets: AssetDirectory,
        storage: CacheStorage,
        surface: Arc<N>,
        clients: Arc<C>,
    ) -> Self {
        Self {
            assets,
            storage,
            surface,
            clients,
            controller: AtomicBool::new(false),
            running: RefCell::new(None),
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    async fn check_script(
        &self,
        root: &DeploymentRoot,
        script_url: &Url,
    ) -> Result<(), NotificationError> {
        if !root.contains(script_url) {
            return Err(NotificationError::RegistrationFailed(format!(
                "script {script_url} is outside scope {root}"
            )));
        }
        let path = self.assets.local_path(root, script_url).ok_or_else(|| {
            NotificationError::RegistrationFailed(format!("script {script_url} has no local file"))
        })?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(NotificationError::RegistrationFailed(format!(
                "script not found: {}",
                path.display()
            ))),
        }
    }

    fn stop_running(&self) {
        if let Some(worker) = self.running.borrow_mut().take() {
            worker.abort();
            debug!("previous worker stopped");
        }
        self.controller.store(false, Ordering::SeqCst);
    }
}

impl<N, C> WorkerHost for LocalWorkerHost<N, C>
where
    N: NotificationSurface + 'static,
    C: ClientRegistry + 'static,
{
    async fn register(
        &self,
        script_url: &Url,
        scope: &Url,
    ) -> Result<ChannelHandle, NotificationError> {
        let root = DeploymentRoot::from_location(scope);
        self.check_script(&root, script_url).await?;
        self.stop_running();

        let (port, events) = mpsc::unbounded_channel();
        let (click_tx, clicks) = mpsc::unbounded_channel();
        self.surface.on_click(click_tx);

        let worker = BackgroundWorker::new(
            root,
            self.assets.clone(),
            self.storage.clone(),
            Arc::clone(&self.surface),
            Arc::clone(&self.clients),
        );
        let task = tokio::spawn(worker.run(events, clicks));
        let handle = ChannelHandle::new(script_url.clone(), scope.clone(), port);

        let installed = match handle.install().await {
            Ok(count) => count,
            Err(e) => {
                task.abort();
                return Err(e);
            }
        };
        if let Err(e) = handle.activate().await {
            task.abort();
            return Err(e);
        }

        *self.running.borrow_mut() = Some(task);
        self.controller.store(true, Ordering::SeqCst);
        info!(script = %script_url, installed, "background worker active");
        Ok(handle)
    }

    fn has_active_controller(&self) -> bool {
        self.controller.load(Ordering::SeqCst)
            && self
                .running
                .borrow()
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }
}

impl<N, C> Drop for LocalWorkerHost<N, C> {
    fn drop(&mut self) {
        if let Some(worker) = self.running.get_mut().take() {
            worker.abort();
        }
    }
}
