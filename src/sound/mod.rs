//! Audio cue playback.
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← trait used by the dispatcher
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────────┐
//! │   SoundSource    │────▶│ deployment asset     │
//! │                  │     │ (timer-complete.mp3) │
//! │                  │     ├──────────────────────┤
//! │                  │────▶│ synthesized chime    │
//! └──────────────────┘     └──────────────────────┘
//! ```

mod chime;
mod error;
mod player;
mod source;

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use chime::{chime_duration, Tone, CHIME_TONES};
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{SoundSource, NOTIFICATION_SOUND, TIMER_COMPLETE_SOUND};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Starts playing `source` without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }
}

impl<T: SoundPlayer + ?Sized> SoundPlayer for Rc<T> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        (**self).play(source)
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

impl<T: SoundPlayer + ?Sized> SoundPlayer for Arc<T> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        (**self).play(source)
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// Used when no output device could be opened.
impl<T: SoundPlayer> SoundPlayer for Option<T> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match self {
            Some(player) => player.play(source),
            None => Err(SoundError::DeviceNotAvailable("no output device".to_string())),
        }
    }

    fn is_disabled(&self) -> bool {
        self.as_ref().map_or(true, SoundPlayer::is_disabled)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        if let Ok(mut calls) = self.play_calls.lock() {
            calls.push(source.clone());
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_plays() {
        let player = MockSoundPlayer::new();
        player.play(&SoundSource::Chime).unwrap();
        player.play(&SoundSource::Chime).unwrap();

        assert_eq!(player.play_count(), 2);
        assert_eq!(player.get_play_calls()[0], SoundSource::Chime);
    }

    #[test]
    fn test_mock_failure() {
        let player = MockSoundPlayer::new();
        player.set_should_fail(true);

        assert!(player.play(&SoundSource::Chime).is_err());
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_rc_forwards_to_inner() {
        let player = Rc::new(MockSoundPlayer::new());
        let shared = Rc::clone(&player);

        shared.play(&SoundSource::Chime).unwrap();

        assert_eq!(player.play_count(), 1);
    }

    #[test]
    fn test_missing_player_reports_device_error() {
        let player: Option<MockSoundPlayer> = None;

        let err = player.play(&SoundSource::Chime).unwrap_err();

        assert!(err.is_device_error());
        assert!(player.is_disabled());
    }
}
