//! Background channel registration.

use std::cell::{OnceCell, RefCell};

use tracing::{info, warn};
use url::Url;

use crate::deployment::DeploymentRoot;
use crate::worker::ChannelHandle;

use super::platform::{PlatformCapabilities, WorkerHost};

/// Registers the background worker and keeps its handle.
///
/// Every URL is resolved against the deployment root, which is derived once
/// from the location and reused for later lookups.
pub struct BackgroundChannelRegistrar<W> {
    host: W,
    capabilities: PlatformCapabilities,
    location: Url,
    root: OnceCell<DeploymentRoot>,
    handle: RefCell<Option<ChannelHandle>>,
}

impl<W: WorkerHost> BackgroundChannelRegistrar<W> {
    pub fn new(host: W, capabilities: PlatformCapabilities, location: Url) -> Self {
        Self {
            host,
            capabilities,
            location,
            root: OnceCell::new(),
            handle: RefCell::new(None),
        }
    }

    /// Returns the deployment root, resolving it on first use.
    pub fn deployment_root(&self) -> &DeploymentRoot {
        self.root
            .get_or_init(|| DeploymentRoot::from_location(&self.location))
    }

    /// Registers the worker script found at `script_path` under the root.
    ///
    /// Returns `None` and logs the reason on any failure.
    pub async fn register(&self, script_path: &str) -> Option<ChannelHandle> {
        if !self.capabilities.background_workers {
            warn!("background workers are not supported, using foreground notifications");
            return None;
        }

        let root = self.deployment_root();
        let script_url = root.asset_url(script_path);
        match self.host.register(&script_url, root.as_url()).await {
            Ok(handle) => {
                info!(script = %script_url, "background worker registered");
                *self.handle.borrow_mut() = Some(handle.clone());
                Some(handle)
            }
            Err(e) => {
                warn!("background worker registration failed: {}", e);
                None
            }
        }
    }

    /// Returns the registered handle, if any.
    pub fn handle(&self) -> Option<ChannelHandle> {
        self.handle.borrow().clone()
    }

    /// Returns true if a registered worker controls the foreground.
    pub fn has_active_controller(&self) -> bool {
        self.host.has_active_controller()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::mock::MockWorkerHost;
    use std::rc::Rc;

    fn registrar(
        host: &Rc<MockWorkerHost>,
        location: &str,
        capabilities: PlatformCapabilities,
    ) -> BackgroundChannelRegistrar<Rc<MockWorkerHost>> {
        BackgroundChannelRegistrar::new(
            Rc::clone(host),
            capabilities,
            Url::parse(location).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_script_resolved_under_sub_path() {
        let host = Rc::new(MockWorkerHost::new());
        let registrar = registrar(
            &host,
            "https://example.github.io/focusbell/index.html",
            PlatformCapabilities::all(),
        );

        let handle = registrar.register("sw.js").await;

        assert!(handle.is_some());
        let calls = host.register_calls();
        assert_eq!(
            calls[0].0.as_str(),
            "https://example.github.io/focusbell/sw.js"
        );
        assert_eq!(calls[0].1.as_str(), "https://example.github.io/focusbell/");
        assert!(registrar.handle().is_some());
    }

    #[tokio::test]
    async fn test_no_capability_returns_absent() {
        let host = Rc::new(MockWorkerHost::new());
        let registrar = registrar(
            &host,
            "http://localhost/",
            PlatformCapabilities::foreground_only(),
        );

        assert!(registrar.register("sw.js").await.is_none());
        assert!(host.register_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_absorbed() {
        let host = Rc::new(MockWorkerHost::new());
        host.set_should_fail(true);
        let registrar = registrar(&host, "http://localhost/", PlatformCapabilities::all());

        assert!(registrar.register("sw.js").await.is_none());
        assert!(registrar.handle().is_none());
    }

    #[test]
    fn test_root_resolved_once() {
        let host = Rc::new(MockWorkerHost::new());
        let registrar = registrar(
            &host,
            "https://example.github.io/focusbell",
            PlatformCapabilities::all(),
        );

        let first = registrar.deployment_root() as *const DeploymentRoot;
        let second = registrar.deployment_root() as *const DeploymentRoot;

        assert_eq!(first, second);
        assert_eq!(registrar.deployment_root().path(), "/focusbell/");
    }
}
