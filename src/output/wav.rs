//! Renders tones to a WAV file instead of a device.

use std::path::{Path, PathBuf};

use log::info;

use super::AudioOutput;
use crate::error::PlaybackError;
use crate::waveform::Waveform;

/// Writes each played waveform to a mono 32-bit float WAV file.
///
/// Every call to `play` overwrites the file with the latest tone.
#[derive(Debug, Clone)]
pub struct WavOutput {
    path: PathBuf,
}

impl WavOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioOutput for WavOutput {
    fn play(&mut self, waveform: &Waveform) -> Result<(), PlaybackError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate(),
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let mut writer = hound::WavWriter::create(&self.path, spec)?;
        for &sample in waveform.samples() {
            writer.write_sample(sample as f32)?;
        }
        writer.finalize()?;

        info!(
            "wrote {} samples to {}",
            waveform.len(),
            self.path.display()
        );
        Ok(())
    }
}
