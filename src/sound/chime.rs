//! Synthesized fallback chime.
//!
//! Played when the deployment's cue asset is missing or cannot be decoded.

use std::time::Duration;

use rodio::source::{SineWave, Source};

/// One tone of the chime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f32,
    /// Length of the tone
    pub duration: Duration,
}

/// Two rising tones.
pub const CHIME_TONES: [Tone; 2] = [
    Tone {
        frequency: 880.0,
        duration: Duration::from_millis(180),
    },
    Tone {
        frequency: 1320.0,
        duration: Duration::from_millis(260),
    },
];

/// Output gain applied to every tone.
pub const CHIME_GAIN: f32 = 0.2;

/// Returns the chime as a sequence of playable sources.
pub fn chime_sources() -> impl Iterator<Item = impl Source<Item = f32> + Send + 'static> {
    CHIME_TONES.into_iter().map(|tone| {
        SineWave::new(tone.frequency)
            .take_duration(tone.duration)
            .amplify(CHIME_GAIN)
    })
}

/// Total length of the chime.
pub fn chime_duration() -> Duration {
    CHIME_TONES.iter().map(|tone| tone.duration).sum()
}
