//! Signal combinators for shaping a generated tone.
//!
//! `Gain` scales a signal by a fixed factor and `Take` turns an endless
//! signal into a finite run of samples that can be iterated.

use super::{AudioSignal, Signal};

/// Applies a constant gain (volume) to a signal.
///
/// # Examples
///
/// ```
/// use keepalive_tone::{Signal, SignalExt, SineOscillator};
///
/// let mut quiet = SineOscillator::<44100>::new(50.0).gain(0.001);
/// assert!(quiet.next_sample().abs() <= 0.001);
/// ```
#[derive(Debug, Clone)]
pub struct Gain<S: Signal> {
    source: S,
    gain: f64,
}

impl<S: Signal> Gain<S> {
    /// Creates a new gain stage.
    pub fn new(source: S, gain: f64) -> Self {
        Self { source, gain }
    }
}

impl<S: Signal> Signal for Gain<S> {
    fn next_sample(&mut self) -> f64 {
        self.source.next_sample() * self.gain
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> AudioSignal<SAMPLE_RATE> for Gain<S> {}

/// Limits a signal to a fixed number of samples.
///
/// `Take` is both a `Signal` (yielding silence once exhausted) and an
/// `ExactSizeIterator` over the remaining samples.
///
/// # Examples
///
/// ```
/// use keepalive_tone::{SignalExt, SineOscillator};
///
/// let tone = SineOscillator::<44100>::new(50.0).take_samples(441);
/// assert_eq!(tone.len(), 441);
/// assert_eq!(tone.count(), 441);
/// ```
#[derive(Debug, Clone)]
pub struct Take<S: Signal> {
    source: S,
    remaining: usize,
}

impl<S: Signal> Take<S> {
    /// Creates a finite view over the first `count` samples of `source`.
    pub fn new(source: S, count: usize) -> Self {
        Self {
            source,
            remaining: count,
        }
    }
}

impl<S: Signal> Signal for Take<S> {
    fn next_sample(&mut self) -> f64 {
        self.next().unwrap_or(0.0)
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> AudioSignal<SAMPLE_RATE> for Take<S> {}

impl<S: Signal> Iterator for Take<S> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.source.next_sample())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Signal> ExactSizeIterator for Take<S> {}

/// Extension trait for fluent signal composition.
///
/// # Examples
///
/// ```
/// use keepalive_tone::{SignalExt, SineOscillator};
///
/// let tone = SineOscillator::<44100>::new(50.0)
///     .gain(0.8)
///     .take_samples(44100);
/// assert_eq!(tone.len(), 44100);
/// ```
pub trait SignalExt: Signal + Sized {
    /// Applies a gain factor to this signal.
    fn gain(self, gain: f64) -> Gain<Self> {
        Gain::new(self, gain)
    }

    /// Limits this signal to `count` samples.
    fn take_samples(self, count: usize) -> Take<Self> {
        Take::new(self, count)
    }
}

// Blanket implementation for all Signal types
impl<T: Signal> SignalExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl Signal for Constant {
        fn next_sample(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_gain() {
        let mut gained = Constant(0.5).gain(2.0);
        assert_eq!(gained.next_sample(), 1.0);
    }

    #[test]
    fn test_zero_gain_silences() {
        let mut silent = Constant(1.0).gain(0.0);
        assert_eq!(silent.next_sample(), 0.0);
    }

    #[test]
    fn test_take_is_exact_size() {
        let mut take = Constant(1.0).take_samples(3);
        assert_eq!(take.len(), 3);
        take.next();
        assert_eq!(take.len(), 2);
        assert_eq!(take.by_ref().count(), 2);
        assert_eq!(take.next(), None);
    }

    #[test]
    fn test_exhausted_take_yields_silence() {
        let mut take = Constant(1.0).take_samples(1);
        assert_eq!(take.next_sample(), 1.0);
        assert_eq!(take.next_sample(), 0.0);
    }

    #[test]
    fn test_signal_ext_chaining() {
        let samples: Vec<f64> = Constant(0.5).gain(0.5).take_samples(2).collect();
        assert_eq!(samples, vec![0.25, 0.25]);
    }
}
