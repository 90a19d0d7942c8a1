//! Sound player implementation using rodio.
//!
//! `RodioSoundPlayer` decodes the cue asset from disk and plays it on a
//! detached sink. A missing or undecodable asset falls back to the chime.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::chime::chime_sources;
use super::error::SoundError;
use super::source::SoundSource;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue after `play` returns.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Plays a sound from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the output sink cannot be created or, for a
    /// non-file failure, if the asset cannot be played.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("sound playback disabled, skipping");
            return Ok(());
        }

        match source {
            SoundSource::Asset { path, .. } => {
                debug!(sound = source.name(), "playing cue asset");
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_chime() => {
                        warn!("cue '{}' unavailable: {}, playing chime", source.name(), e);
                        self.play_chime()
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::Chime => {
                debug!("playing chime");
                self.play_chime()
            }
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder.convert_samples::<f32>());
        sink.detach();

        debug!("sound playback started (detached)");
        Ok(())
    }

    fn play_chime(&self) -> Result<(), SoundError> {
        let sink = self.sink()?;
        for tone in chime_sources() {
            sink.append(tone);
        }
        sink.detach();
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    /// Disables sound playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("audio not available, sound disabled: {}", e);
            None
        }
    }
}
