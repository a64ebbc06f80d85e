//! Core signal processing types and traits.
//!
//! This module provides the abstractions the tone is built from:
//! - `Signal` trait for all signal sources and processors
//! - `AudioSignal` trait for sample-rate-aware signals
//! - `SignalExt` combinators (`gain`, `take_samples`)

mod audio;
pub mod combinators;
mod signal;

pub use audio::AudioSignal;
pub use combinators::{Gain, SignalExt, Take};
pub use signal::Signal;
