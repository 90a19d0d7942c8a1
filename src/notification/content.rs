//! Notification content construction.
//!
//! `NotificationOptions` carries everything the surface needs besides the
//! title. The worker tier and the foreground tier build it through the
//! same fluent API so both show the same icon, badge and tag.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deployment::DeploymentRoot;

/// Tag shared by every notification so a new one replaces the previous.
pub const NOTIFICATION_TAG: &str = "pomodoro-notification";

/// Root-relative path of the notification icon.
pub const ICON_ASSET: &str = "icons/icon-192x192.png";

/// Vibration pattern in milliseconds (on, off, on).
pub const VIBRATE_PATTERN: [u32; 3] = [200, 100, 200];

/// How long a foreground notification stays up.
pub const FALLBACK_AUTO_CLOSE: Duration = Duration::from_secs(5);

/// Maximum length for title and body text.
const MAX_TEXT_LENGTH: usize = 200;

/// Identifies a notification shown on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Generates a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for a single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub renotify: bool,
    pub require_interaction: bool,
    pub vibrate: Vec<u32>,
    /// Close automatically after this long; `None` leaves it to the user.
    #[serde(skip)]
    pub auto_close: Option<Duration>,
}

impl NotificationOptions {
    /// Starts a builder with the shared icon, badge and tag.
    #[must_use]
    pub fn builder(icon: impl Into<String>) -> NotificationOptionsBuilder {
        NotificationOptionsBuilder::new(icon)
    }

    /// Options the background worker uses.
    #[must_use]
    pub fn persistent(body: &str, icon: &str) -> Self {
        Self::builder(icon)
            .body(body)
            .renotify(true)
            .require_interaction(true)
            .vibrate(&VIBRATE_PATTERN)
            .build()
    }

    /// Options for a notification shown directly by the foreground.
    #[must_use]
    pub fn transient(body: &str, icon: &str) -> Self {
        Self::builder(icon)
            .body(body)
            .renotify(true)
            .auto_close(FALLBACK_AUTO_CLOSE)
            .build()
    }
}

/// Builder for constructing notification options.
#[derive(Debug, Clone)]
pub struct NotificationOptionsBuilder {
    options: NotificationOptions,
}

impl NotificationOptionsBuilder {
    /// Creates a builder; the badge defaults to the icon.
    #[must_use]
    pub fn new(icon: impl Into<String>) -> Self {
        let icon = icon.into();
        Self {
            options: NotificationOptions {
                body: String::new(),
                badge: icon.clone(),
                icon,
                tag: NOTIFICATION_TAG.to_string(),
                renotify: false,
                require_interaction: false,
                vibrate: Vec::new(),
                auto_close: None,
            },
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.options.body = sanitize_text(body);
        self
    }

    /// Sets the badge.
    #[must_use]
    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.options.badge = badge.into();
        self
    }

    /// Sets the replacement tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.options.tag = tag.into();
        self
    }

    #[must_use]
    pub fn renotify(mut self, renotify: bool) -> Self {
        self.options.renotify = renotify;
        self
    }

    #[must_use]
    pub fn require_interaction(mut self, require: bool) -> Self {
        self.options.require_interaction = require;
        self
    }

    #[must_use]
    pub fn vibrate(mut self, pattern: &[u32]) -> Self {
        self.options.vibrate = pattern.to_vec();
        self
    }

    #[must_use]
    pub fn auto_close(mut self, after: Duration) -> Self {
        self.options.auto_close = Some(after);
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> NotificationOptions {
        self.options
    }
}

/// Returns the icon URL for the deployment.
#[must_use]
pub fn default_icon(root: &DeploymentRoot) -> String {
    root.asset_url(ICON_ASSET).to_string()
}

/// Strips control characters and truncates notification text.
///
/// Newlines are kept since notification bodies may span lines.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .take(MAX_TEXT_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = "http://localhost/icons/icon-192x192.png";

    #[test]
    fn test_builder_defaults_badge_and_tag() {
        let options = NotificationOptions::builder(ICON).build();
        assert_eq!(options.badge, ICON);
        assert_eq!(options.tag, NOTIFICATION_TAG);
        assert!(options.body.is_empty());
        assert!(options.auto_close.is_none());
    }

    #[test]
    fn test_persistent_options() {
        let options = NotificationOptions::persistent("Time to focus.", ICON);
        assert_eq!(options.body, "Time to focus.");
        assert!(options.renotify);
        assert!(options.require_interaction);
        assert_eq!(options.vibrate, vec![200, 100, 200]);
        assert!(options.auto_close.is_none());
    }

    #[test]
    fn test_transient_options() {
        let options = NotificationOptions::transient("Time to focus.", ICON);
        assert_eq!(options.icon, ICON);
        assert_eq!(options.badge, ICON);
        assert_eq!(options.tag, NOTIFICATION_TAG);
        assert!(!options.require_interaction);
        assert_eq!(options.auto_close, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("a\tb\u{7}c"), "abc");
        assert_eq!(sanitize_text("line\nbreak"), "line\nbreak");
        assert_eq!(sanitize_text(&"x".repeat(500)).len(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn test_default_icon_follows_root() {
        let root = DeploymentRoot::parse("https://example.github.io/focusbell/").unwrap();
        assert_eq!(
            default_icon(&root),
            "https://example.github.io/focusbell/icons/icon-192x192.png"
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(NotificationOptions::persistent("b", ICON)).unwrap();
        assert_eq!(json["requireInteraction"], true);
        assert!(json.get("autoClose").is_none());
    }
}
