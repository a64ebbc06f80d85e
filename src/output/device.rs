//! Playback on the system's default output device through cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use crossbeam::channel::{Sender, bounded};
use log::debug;

use super::AudioOutput;
use crate::error::PlaybackError;
use crate::waveform::Waveform;

/// What the audio callbacks report back to the blocked caller.
enum StreamEvent {
    Finished,
    Failed(String),
}

/// Plays tones on the default output device.
///
/// The host and device are looked up again for every tone, so a monitor
/// interface that was unplugged and reconnected between ticks is picked up
/// without restarting.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceOutput;

impl DeviceOutput {
    pub fn new() -> Self {
        Self
    }
}

impl AudioOutput for DeviceOutput {
    fn play(&mut self, waveform: &Waveform) -> Result<(), PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoOutputDevice)?;

        let supported = device.default_output_config()?;
        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(waveform.sample_rate()),
            buffer_size: cpal::BufferSize::Default,
        };

        debug!(
            "playing {} samples at {} Hz on {}",
            waveform.len(),
            waveform.sample_rate(),
            device.name().unwrap_or_else(|_| "unknown device".to_string())
        );

        let (events, finished) = bounded(1);
        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, waveform, events)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, waveform, events)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, waveform, events)?,
            sample_format => {
                return Err(PlaybackError::UnsupportedSampleFormat(
                    sample_format.to_string(),
                ));
            }
        };
        stream.play()?;

        // The stream owns both senders, so the channel stays open until it drops.
        match finished.recv() {
            Ok(StreamEvent::Finished) => Ok(()),
            Ok(StreamEvent::Failed(message)) => Err(PlaybackError::Stream(message)),
            Err(_) => Err(PlaybackError::Interrupted),
        }
    }
}

/// Creates an output stream that feeds `waveform` to every channel, then
/// reports `Finished` from the first callback after the last sample went out.
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    waveform: &Waveform,
    events: Sender<StreamEvent>,
) -> Result<cpal::Stream, PlaybackError>
where
    T: SizedSample + FromSample<f64>,
{
    let channels = config.channels as usize;
    let samples = waveform.shared_samples();
    let mut position = 0usize;
    let done = events.clone();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if position >= samples.len() {
                data.fill(T::EQUILIBRIUM);
                let _ = done.try_send(StreamEvent::Finished);
                return;
            }
            for frame in data.chunks_mut(channels) {
                let value = samples
                    .get(position)
                    .map_or(T::EQUILIBRIUM, |&sample| T::from_sample(sample));
                frame.fill(value);
                position += 1;
            }
        },
        move |err| {
            let _ = events.try_send(StreamEvent::Failed(err.to_string()));
        },
        None,
    )?;

    Ok(stream)
}
