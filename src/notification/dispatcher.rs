//! End-of-interval alert delivery.
//!
//! `send` plays the audio cue, makes sure permission is granted (asking at
//! most once) and then picks exactly one delivery tier:
//!
//! 1. Preferred: post to the background worker, which shows a persistent
//!    notification.
//! 2. Fallback: show a transient notification directly from the foreground.
//! 3. No-op: log only.

use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::deployment::{AssetDirectory, DeploymentRoot};
use crate::sound::{SoundPlayer, SoundSource, TIMER_COMPLETE_SOUND};
use crate::timer::{Notifier, TransitionNotice};
use crate::types::NotificationRequest;
use crate::worker::WorkerMessage;

use super::content::{default_icon, NotificationOptions};
use super::permission::PermissionBroker;
use super::platform::{NotificationSurface, PermissionPrompt, PlatformCapabilities, WorkerHost};
use super::registrar::BackgroundChannelRegistrar;

/// How a notification reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTier {
    /// Shown by the background worker
    Preferred,
    /// Shown by the foreground
    Fallback,
}

/// Why nothing was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The platform has no notification facility
    CapabilityAbsent,
    /// Permission is not granted
    PermissionDenied,
    /// Neither the worker nor the foreground surface could show it
    NoChannel,
}

/// Result of one `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(DeliveryTier),
    Skipped(SkipReason),
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub capabilities: PlatformCapabilities,
    /// Local files behind the deployment, for the audio cue
    pub assets: Option<AssetDirectory>,
}

/// Picks a delivery tier and performs the side effects.
pub struct NotificationDispatcher<P, W, N, S> {
    broker: Rc<PermissionBroker<P>>,
    registrar: Rc<BackgroundChannelRegistrar<W>>,
    surface: Arc<N>,
    sound: S,
    config: DispatcherConfig,
}

impl<P, W, N, S> NotificationDispatcher<P, W, N, S>
where
    P: PermissionPrompt,
    W: WorkerHost,
    N: NotificationSurface + 'static,
    S: SoundPlayer,
{
    pub fn new(
        broker: Rc<PermissionBroker<P>>,
        registrar: Rc<BackgroundChannelRegistrar<W>>,
        surface: Arc<N>,
        sound: S,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            broker,
            registrar,
            surface,
            sound,
            config,
        }
    }

    pub fn broker(&self) -> &PermissionBroker<P> {
        &self.broker
    }

    pub fn registrar(&self) -> &BackgroundChannelRegistrar<W> {
        &self.registrar
    }

    fn root(&self) -> &DeploymentRoot {
        self.registrar.deployment_root()
    }

    /// Delivers one alert.
    pub async fn send(&self, title: &str, body: &str) -> DeliveryOutcome {
        self.play_cue();

        if !self.config.capabilities.notifications {
            warn!("notifications are not supported, alert not shown");
            return DeliveryOutcome::Skipped(SkipReason::CapabilityAbsent);
        }

        let request = NotificationRequest::new(title, body, default_icon(self.root()));

        if self.broker.current_state().is_granted() {
            return self.deliver(&request);
        }

        // One prompt, one retry.
        debug!("permission not granted, asking");
        if self.broker.request_permission().await.is_granted() {
            return self.deliver(&request);
        }
        info!("notification permission denied, alert not shown");
        DeliveryOutcome::Skipped(SkipReason::PermissionDenied)
    }

    fn play_cue(&self) {
        if self.sound.is_disabled() {
            return;
        }
        let source = SoundSource::resolve(
            self.root(),
            self.config.assets.as_ref(),
            TIMER_COMPLETE_SOUND,
        );
        if let Err(e) = self.sound.play(&source) {
            debug!("audio cue failed: {}", e);
        }
    }

    /// Tier selection. Never prompts and never plays sound.
    fn deliver(&self, request: &NotificationRequest) -> DeliveryOutcome {
        if let Some(handle) = self.registrar.handle() {
            if self.registrar.has_active_controller() {
                match handle.post(&WorkerMessage::show(request)) {
                    Ok(()) => {
                        debug!("notification posted to background worker");
                        return DeliveryOutcome::Delivered(DeliveryTier::Preferred);
                    }
                    Err(e) => warn!("background worker unreachable: {}", e),
                }
            }
        }

        if !self.surface.is_available() {
            warn!("no notification channel available");
            return DeliveryOutcome::Skipped(SkipReason::NoChannel);
        }

        let options = NotificationOptions::transient(&request.body, &request.icon_path);
        match self.surface.show(&request.title, &options) {
            Ok(id) => {
                if let Some(after) = options.auto_close {
                    let surface = Arc::clone(&self.surface);
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        surface.close(id);
                    });
                }
                DeliveryOutcome::Delivered(DeliveryTier::Fallback)
            }
            Err(e) => {
                warn!("could not show notification: {}", e);
                DeliveryOutcome::Skipped(SkipReason::NoChannel)
            }
        }
    }
}

impl<P, W, N, S> Notifier for NotificationDispatcher<P, W, N, S>
where
    P: PermissionPrompt,
    W: WorkerHost,
    N: NotificationSurface + 'static,
    S: SoundPlayer,
{
    async fn notify(&self, notice: &TransitionNotice) {
        let outcome = self.send(&notice.title, &notice.body).await;
        debug!(?outcome, next = notice.next.as_str(), "transition alert handled");
    }
}
