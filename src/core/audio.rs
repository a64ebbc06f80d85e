//! Audio signal trait for sample-rate-aware signals.

use crate::Signal;

/// Common interface for anything that can be played as audio.
///
/// This trait extends `Signal` with the sample rate at the type level, so a
/// tone rendered for one rate cannot be handed to code expecting another.
///
/// # Type Parameters
///
/// * `SAMPLE_RATE` - Sample rate in Hz (e.g., 44100 for CD quality)
///
/// # Examples
///
/// ```
/// use keepalive_tone::{AudioSignal, SineOscillator};
///
/// let osc: SineOscillator<44100> = SineOscillator::new(50.0);
/// assert_eq!(osc.sample_rate(), 44100.0);
/// ```
pub trait AudioSignal<const SAMPLE_RATE: u32>: Signal {
    /// Gets the sample rate at which this audio is being generated.
    fn sample_rate(&self) -> f64 {
        SAMPLE_RATE as f64
    }
}
