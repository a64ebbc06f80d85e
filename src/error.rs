//! Error types for tone synthesis, playback and scheduling.

use thiserror::Error;

/// Errors raised while sending a waveform to an output.
///
/// None of these are fatal to a running schedule: the scheduler logs them and
/// tries the device again on the next tick.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no default audio output device available")]
    NoOutputDevice,

    #[cfg(feature = "playback")]
    #[error("could not query output device configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "playback")]
    #[error("could not open output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "playback")]
    #[error("could not start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("output stream failed during playback: {0}")]
    Stream(String),

    #[error("playback interrupted before the tone finished")]
    Interrupted,

    #[cfg(feature = "wav-export")]
    #[error("could not write wav file: {0}")]
    Wav(#[from] hound::Error),
}

/// Errors surfaced by the tone scheduler.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid schedule configuration: {0}")]
    InvalidConfig(String),

    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("could not spawn scheduler thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
