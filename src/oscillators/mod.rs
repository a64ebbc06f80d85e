//! Oscillator implementations.
//!
//! The keep-alive tone is generated from the sine oscillator.

mod sine;

pub use sine::SineOscillator;
