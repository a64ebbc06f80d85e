//! Tone synthesis.
//!
//! `synthesize` describes a tone lazily; `Waveform::render` collects it into
//! a shareable buffer that an output can play.

use std::sync::Arc;

use crate::config::ScheduleConfig;
use crate::core::{AudioSignal, Gain, SignalExt, Take};
use crate::oscillators::SineOscillator;

/// A finite, lazily generated tone.
///
/// Yields exactly `floor(SAMPLE_RATE * duration)` samples, sample `i` being
/// `sin(2π · frequency · i / SAMPLE_RATE) · volume`.
pub type Tone<const SAMPLE_RATE: u32> = Take<Gain<SineOscillator<SAMPLE_RATE>>>;

/// Describes the tone for `config` at `SAMPLE_RATE`.
///
/// Pure and deterministic: the output depends only on the config's
/// frequency, duration and volume.
///
/// # Examples
///
/// ```
/// use keepalive_tone::{synthesize, ScheduleConfig, SAMPLE_RATE};
///
/// let config = ScheduleConfig::new(50.0, 3.0, 1500, 0.8).unwrap();
/// let tone = synthesize::<SAMPLE_RATE>(&config);
/// assert_eq!(tone.len(), 132_300);
/// ```
pub fn synthesize<const SAMPLE_RATE: u32>(config: &ScheduleConfig) -> Tone<SAMPLE_RATE> {
    SineOscillator::<SAMPLE_RATE>::new(config.frequency_hz())
        .gain(config.volume())
        .take_samples(config.sample_count(SAMPLE_RATE))
}

/// A rendered tone ready for playback.
///
/// Samples live behind an `Arc` so an output can hand them to its audio
/// callback without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Arc<[f64]>,
    sample_rate: u32,
}

impl Waveform {
    /// Renders a finite signal into memory, tagged with the rate it was
    /// generated at.
    pub fn render<const SAMPLE_RATE: u32, S>(signal: S) -> Self
    where
        S: AudioSignal<SAMPLE_RATE> + ExactSizeIterator<Item = f64>,
    {
        let sample_rate = signal.sample_rate() as u32;
        Self {
            samples: signal.collect(),
            sample_rate,
        }
    }

    /// Synthesizes and renders the tone for `config` in one step.
    pub fn from_config<const SAMPLE_RATE: u32>(config: &ScheduleConfig) -> Self {
        Self::render::<SAMPLE_RATE, _>(synthesize::<SAMPLE_RATE>(config))
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub(crate) fn shared_samples(&self) -> Arc<[f64]> {
        Arc::clone(&self.samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
