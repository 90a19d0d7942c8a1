//! Notification system error types.
//!
//! Every variant is recoverable: the component that observes it logs it and
//! degrades to the next delivery option. The only user-visible effect is a
//! missing alert.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The runtime offers no notification facility at all.
    #[error("notifications are not supported on this platform")]
    CapabilityAbsent,

    /// Notification permission was not granted.
    #[error("notification permission was denied")]
    PermissionDenied,

    /// The background worker could not be registered.
    #[error("background worker registration failed: {0}")]
    RegistrationFailed(String),

    /// The audio cue could not be played.
    #[error("audio cue playback failed: {0}")]
    PlaybackFailed(String),

    /// Failed to show or post a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// Invalid input provided to the notification system.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns true if the platform lacks the required facility.
    #[must_use]
    pub fn is_capability_error(&self) -> bool {
        matches!(self, Self::CapabilityAbsent)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::CapabilityAbsent => "make sure a desktop notification daemon is running",
            Self::PermissionDenied => "answer 'y' to the permission prompt or pass --allow-notifications",
            Self::RegistrationFailed(_) => "check that --assets points at the deployment files",
            Self::PlaybackFailed(_) => "check the audio device or pass --no-sound",
            Self::SendFailed(_) => "check the notification daemon",
            Self::InvalidInput(_) => "check the input values",
        }
    }
}

impl From<crate::sound::SoundError> for NotificationError {
    fn from(err: crate::sound::SoundError) -> Self {
        Self::PlaybackFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::PermissionDenied;
        assert_eq!(err.to_string(), "notification permission was denied");

        let err = NotificationError::RegistrationFailed("missing sw.js".to_string());
        assert!(err.to_string().contains("missing sw.js"));
    }

    #[test]
    fn test_is_permission_error() {
        assert!(NotificationError::PermissionDenied.is_permission_error());
        assert!(!NotificationError::CapabilityAbsent.is_permission_error());
    }

    #[test]
    fn test_is_capability_error() {
        assert!(NotificationError::CapabilityAbsent.is_capability_error());
        assert!(!NotificationError::SendFailed("x".into()).is_capability_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(NotificationError::PermissionDenied
            .suggestion()
            .contains("--allow-notifications"));
    }

    #[test]
    fn test_from_sound_error() {
        let err: NotificationError =
            crate::sound::SoundError::StreamError("busy".to_string()).into();
        assert!(matches!(err, NotificationError::PlaybackFailed(_)));
    }
}
