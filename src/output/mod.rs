//! Destinations a rendered tone can be played to.
//!
//! The scheduler talks to audio hardware only through `AudioOutput`, so the
//! default device, a WAV file, or a test double can stand behind it.

#[cfg(feature = "playback")]
mod device;
#[cfg(feature = "wav-export")]
mod wav;

#[cfg(feature = "playback")]
pub use device::DeviceOutput;
#[cfg(feature = "wav-export")]
pub use wav::WavOutput;

use crate::error::PlaybackError;
use crate::waveform::Waveform;

/// Something that can play a waveform to completion.
///
/// `play` blocks the caller until the whole waveform has been delivered or
/// playback fails. Implementations are treated as exclusive resources; the
/// scheduler never calls `play` on the same output concurrently.
pub trait AudioOutput: Send + 'static {
    /// Plays `waveform` at its own sample rate, returning once it has finished.
    fn play(&mut self, waveform: &Waveform) -> Result<(), PlaybackError>;
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn play(&mut self, waveform: &Waveform) -> Result<(), PlaybackError> {
        (**self).play(waveform)
    }
}
