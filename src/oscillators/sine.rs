//! Sine wave oscillator implementation.

use crate::{AudioSignal, Signal};
use std::f64::consts::TAU;

/// A sine oscillator evaluated directly from the sample index.
///
/// Sample `n` is `sin(2π · frequency · n / SAMPLE_RATE)`. Computing each
/// sample from its index instead of accumulating phase keeps the output a
/// pure function of `(frequency, n)`, so two oscillators built with the same
/// frequency always produce bit-identical sequences.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 for CD quality)
#[derive(Debug, Clone)]
pub struct SineOscillator<const SAMPLE_RATE: u32> {
    frequency: f64,
    /// Index of the next sample to generate
    index: u64,
}

impl<const SAMPLE_RATE: u32> SineOscillator<SAMPLE_RATE> {
    /// Creates a new sine oscillator.
    ///
    /// # Arguments
    ///
    /// * `frequency` - Frequency of the sine wave in Hz
    ///
    /// # Examples
    ///
    /// ```
    /// use keepalive_tone::{Signal, SineOscillator};
    ///
    /// // A 50 Hz tone, below what most people hear on nearfield monitors
    /// let mut osc = SineOscillator::<44100>::new(50.0);
    /// assert_eq!(osc.next_sample(), 0.0);
    /// ```
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            index: 0,
        }
    }
}

impl<const SAMPLE_RATE: u32> Signal for SineOscillator<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let t = self.index as f64 / SAMPLE_RATE as f64;
        self.index += 1;
        (TAU * self.frequency * t).sin()
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for SineOscillator<SAMPLE_RATE> {}
