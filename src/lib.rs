//! keepalive-tone - keeps studio monitors out of auto-standby
//!
//! Many active monitors power down after a stretch of silence. This crate
//! plays a short, very low frequency sine tone on a fixed interval so the
//! speakers always see a signal.
//!
//! ```no_run
//! use keepalive_tone::{DeviceOutput, Preset, ScheduleConfig, ToneScheduler};
//!
//! let config = ScheduleConfig::preset(Preset::Subsonic);
//! let mut scheduler = ToneScheduler::new(config, DeviceOutput::new());
//! scheduler.test_tone()?;
//! scheduler.start()?;
//! # Ok::<(), keepalive_tone::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod oscillators;
pub mod output;
pub mod scheduler;
pub mod waveform;

// Re-export commonly used types at the crate root
pub use config::{MAX_DURATION_SECS, MAX_INTERVAL_SECS, Preset, SAMPLE_RATE, ScheduleConfig};
pub use crate::core::{AudioSignal, Gain, Signal, SignalExt, Take};
pub use error::{Error, PlaybackError, Result};
pub use oscillators::SineOscillator;
pub use output::AudioOutput;
#[cfg(feature = "playback")]
pub use output::DeviceOutput;
#[cfg(feature = "wav-export")]
pub use output::WavOutput;
pub use scheduler::{POLL_INTERVAL, RunState, ToneScheduler};
pub use waveform::{Tone, Waveform, synthesize};
