//! In-memory platform fakes for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;

use crate::types::PermissionState;
use crate::worker::{ChannelHandle, WorkerEvent};

use super::content::{NotificationId, NotificationOptions};
use super::error::NotificationError;
use super::platform::{NotificationSurface, PermissionPrompt, WorkerHost};

// ============================================================================
// MockPermissionPrompt
// ============================================================================

/// Mock permission prompt.
///
/// Queued answers are handed out in call order. With an empty queue a
/// prompt resolves to the current state.
#[derive(Debug)]
pub struct MockPermissionPrompt {
    current: Mutex<PermissionState>,
    answers: Mutex<VecDeque<(PermissionState, Duration)>>,
    prompts: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockPermissionPrompt {
    #[must_use]
    pub fn new(current: PermissionState) -> Self {
        Self {
            current: Mutex::new(current),
            answers: Mutex::new(VecDeque::new()),
            prompts: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn push_answer(&self, answer: PermissionState) {
        self.push_delayed_answer(answer, Duration::ZERO);
    }

    /// Queues an answer that settles after `delay`.
    pub fn push_delayed_answer(&self, answer: PermissionState, delay: Duration) {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back((answer, delay));
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::InvalidInput("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl PermissionPrompt for MockPermissionPrompt {
    fn current(&self) -> Result<PermissionState, NotificationError> {
        self.fail()?;
        Ok(self
            .current
            .lock()
            .map(|state| *state)
            .unwrap_or(PermissionState::Unknown))
    }

    async fn prompt(&self) -> Result<PermissionState, NotificationError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.fail()?;

        let next = self.answers.lock().ok().and_then(|mut a| a.pop_front());
        let answer = match next {
            Some((answer, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                answer
            }
            None => self.current()?,
        };
        if let Ok(mut current) = self.current.lock() {
            *current = answer;
        }
        Ok(answer)
    }
}

// ============================================================================
// MockWorkerHost
// ============================================================================

/// Mock worker host. Keeps the worker end of every handle it returns so
/// tests can inspect posted messages.
#[derive(Debug)]
pub struct MockWorkerHost {
    register_calls: Mutex<Vec<(Url, Url)>>,
    inbox: Mutex<Option<mpsc::UnboundedReceiver<WorkerEvent>>>,
    posted: Mutex<Vec<serde_json::Value>>,
    registered: AtomicBool,
    controller: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockWorkerHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkerHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            register_calls: Mutex::new(Vec::new()),
            inbox: Mutex::new(None),
            posted: Mutex::new(Vec::new()),
            registered: AtomicBool::new(false),
            controller: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Whether a registered worker reports itself as the controller.
    pub fn set_controller(&self, active: bool) {
        self.controller.store(active, Ordering::SeqCst);
    }

    /// Simulates the worker stopping: later posts fail.
    pub fn stop_worker(&self) {
        self.drain();
        if let Ok(mut inbox) = self.inbox.lock() {
            inbox.take();
        }
    }

    #[must_use]
    pub fn register_calls(&self) -> Vec<(Url, Url)> {
        self.register_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Returns every message posted so far.
    #[must_use]
    pub fn posted_messages(&self) -> Vec<serde_json::Value> {
        self.drain();
        self.posted.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn drain(&self) {
        let (Ok(mut inbox), Ok(mut posted)) = (self.inbox.lock(), self.posted.lock()) else {
            return;
        };
        if let Some(rx) = inbox.as_mut() {
            while let Ok(event) = rx.try_recv() {
                if let WorkerEvent::Message(value) = event {
                    posted.push(value);
                }
            }
        }
    }
}

impl WorkerHost for MockWorkerHost {
    async fn register(
        &self,
        script_url: &Url,
        scope: &Url,
    ) -> Result<ChannelHandle, NotificationError> {
        if let Ok(mut calls) = self.register_calls.lock() {
            calls.push((script_url.clone(), scope.clone()));
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::RegistrationFailed(
                "Mock failure".to_string(),
            ));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut inbox) = self.inbox.lock() {
            *inbox = Some(rx);
        }
        self.registered.store(true, Ordering::SeqCst);
        Ok(ChannelHandle::new(script_url.clone(), scope.clone(), tx))
    }

    fn has_active_controller(&self) -> bool {
        self.registered.load(Ordering::SeqCst) && self.controller.load(Ordering::SeqCst)
    }
}

// ============================================================================
// MockNotificationSurface
// ============================================================================

/// Mock notification surface.
#[derive(Debug)]
pub struct MockNotificationSurface {
    shown: Mutex<Vec<(String, NotificationOptions)>>,
    ids: Mutex<Vec<NotificationId>>,
    closed: Mutex<Vec<NotificationId>>,
    clicks: Mutex<Option<mpsc::UnboundedSender<NotificationId>>>,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockNotificationSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            ids: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
            clicks: Mutex::new(None),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn shown(&self) -> Vec<(String, NotificationOptions)> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn show_count(&self) -> usize {
        self.shown.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Ids of shown notifications, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<NotificationId> {
        self.ids.lock().map(|s| s.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn closed(&self) -> Vec<NotificationId> {
        self.closed.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Simulates the user activating notification `id`.
    pub fn click(&self, id: NotificationId) -> bool {
        self.clicks
            .lock()
            .ok()
            .and_then(|clicks| clicks.as_ref().map(|tx| tx.send(id).is_ok()))
            .unwrap_or(false)
    }
}

impl NotificationSurface for MockNotificationSurface {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<NotificationId, NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        let id = NotificationId::new();
        if let Ok(mut shown) = self.shown.lock() {
            shown.push((title.to_string(), options.clone()));
        }
        if let Ok(mut ids) = self.ids.lock() {
            ids.push(id);
        }
        Ok(id)
    }

    fn close(&self, id: NotificationId) {
        if let Ok(mut closed) = self.closed.lock() {
            closed.push(id);
        }
    }

    fn on_click(&self, clicks: mpsc::UnboundedSender<NotificationId>) {
        if let Ok(mut slot) = self.clicks.lock() {
            *slot = Some(clicks);
        }
    }
}
