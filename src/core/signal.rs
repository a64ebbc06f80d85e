//! Core signal trait.
//!
//! Everything that produces samples (the sine oscillator, gain stages, the
//! finite tone the scheduler plays) implements `Signal`.

/// Common interface for all signal sources and processors.
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// A sample value, typically between -1.0 and 1.0 for audio signals
    fn next_sample(&mut self) -> f64;
}
