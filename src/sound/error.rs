//! Sound system error types.
//!
//! None of these are fatal: the dispatcher logs them and carries on with
//! notification delivery.

use thiserror::Error;

/// Errors that can occur while playing the audio cue.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Cue asset was not found in the deployment.
    #[error("sound asset not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("could not decode sound asset: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("could not open audio stream: {0}")]
    StreamError(String),

    /// Generic playback failure.
    #[error("sound playback failed: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio asset.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the synthesized chime.
    #[must_use]
    pub fn should_fallback_to_chime(&self) -> bool {
        self.is_file_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert_eq!(err.to_string(), "audio device not available: no device");

        let err = SoundError::FileNotFound("public/timer-complete.mp3".to_string());
        assert!(err.to_string().contains("public/timer-complete.mp3"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_chime() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_chime());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_chime());
        assert!(!SoundError::DeviceNotAvailable("x".into()).should_fallback_to_chime());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_chime());
    }
}
