//! Tone and timing parameters for a scheduler run.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Sample rate every tone is rendered and played at.
pub const SAMPLE_RATE: u32 = 44_100;

/// Longest accepted tone, in seconds.
pub const MAX_DURATION_SECS: f64 = 60.0;

/// Longest accepted pause between tones (one week).
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Parameters controlling the tone and how often it is played.
///
/// A config is immutable once built; changing any parameter means stopping
/// the scheduler and constructing a new one.
///
/// # Examples
///
/// ```
/// use keepalive_tone::ScheduleConfig;
///
/// let config = ScheduleConfig::new(50.0, 3.0, 25 * 60, 0.8).unwrap();
/// assert_eq!(config.interval().as_secs(), 1500);
///
/// assert!(ScheduleConfig::new(-5.0, 3.0, 1500, 0.8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    frequency_hz: f64,
    duration_secs: f64,
    interval_secs: u64,
    volume: f64,
}

impl ScheduleConfig {
    /// Builds a validated config.
    ///
    /// # Arguments
    ///
    /// * `frequency_hz` - Tone frequency, must be positive
    /// * `duration_secs` - Length of each tone, positive and at most `MAX_DURATION_SECS`
    /// * `interval_secs` - Pause between tones, from one second up to `MAX_INTERVAL_SECS`
    /// * `volume` - Amplitude scale in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first offending parameter.
    pub fn new(
        frequency_hz: f64,
        duration_secs: f64,
        interval_secs: u64,
        volume: f64,
    ) -> Result<Self> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frequency must be a positive number of Hz, got {frequency_hz}"
            )));
        }
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "duration must be a positive number of seconds, got {duration_secs}"
            )));
        }
        if duration_secs > MAX_DURATION_SECS {
            return Err(Error::InvalidConfig(format!(
                "duration must be at most {MAX_DURATION_SECS} seconds, got {duration_secs}"
            )));
        }
        if interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "interval must be at least one second".to_string(),
            ));
        }
        if interval_secs > MAX_INTERVAL_SECS {
            return Err(Error::InvalidConfig(format!(
                "interval must be at most {MAX_INTERVAL_SECS} seconds, got {interval_secs}"
            )));
        }
        if !(0.0..=1.0).contains(&volume) {
            return Err(Error::InvalidConfig(format!(
                "volume must be between 0 and 1, got {volume}"
            )));
        }

        Ok(Self {
            frequency_hz,
            duration_secs,
            interval_secs,
            volume,
        })
    }

    /// Builds the config for a named preset.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self {
                frequency_hz: 50.0,
                duration_secs: 3.0,
                interval_secs: 25 * 60,
                volume: 0.8,
            },
            Preset::Subsonic => Self {
                frequency_hz: 10.0,
                duration_secs: 3.0,
                interval_secs: 25 * 60,
                volume: 0.001,
            },
        }
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Number of samples one tone occupies at `sample_rate`.
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.duration_secs).floor() as usize
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::preset(Preset::Classic)
    }
}

impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz for {}s every {} min at volume {}",
            self.frequency_hz,
            self.duration_secs,
            self.interval_secs / 60,
            self.volume
        )
    }
}

/// Known-good parameter sets.
///
/// Both keep monitors awake; they trade loudness against reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// 50 Hz at volume 0.8, loud enough to trip the signal sensor reliably
    #[default]
    Classic,
    /// 10 Hz at volume 0.001, well below hearing
    Subsonic,
}
