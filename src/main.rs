use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{ArgEnum, Parser};
use crossbeam::channel::{Receiver, RecvTimeoutError, bounded, select};
use log::info;

use keepalive_tone::{AudioOutput, DeviceOutput, Preset, ScheduleConfig, ToneScheduler};

/// How often the countdown to the next tone is logged while running.
const STATUS_EVERY: Duration = Duration::from_secs(60);

/// Plays an inaudible tone periodically so studio monitors never auto-standby.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Starting parameter set; individual flags override it
    #[clap(long, arg_enum, default_value = "classic")]
    preset: PresetArg,

    /// Tone frequency in Hz
    #[clap(short, long)]
    frequency: Option<f64>,

    /// Tone duration in seconds
    #[clap(short, long)]
    duration: Option<f64>,

    /// Interval between tones in minutes
    #[clap(short, long)]
    interval: Option<u64>,

    /// Tone volume between 0 and 1
    #[clap(short, long)]
    volume: Option<f64>,

    /// Play one tone and exit
    #[clap(long)]
    test: bool,

    /// Write one tone to a WAV file instead of playing it
    #[cfg(feature = "wav-export")]
    #[clap(long, value_name = "PATH")]
    export: Option<std::path::PathBuf>,
}

#[derive(ArgEnum, Clone, Copy)]
enum PresetArg {
    Classic,
    Subsonic,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Classic => Preset::Classic,
            PresetArg::Subsonic => Preset::Subsonic,
        }
    }
}

impl Cli {
    fn schedule_config(&self) -> Result<ScheduleConfig> {
        let preset = ScheduleConfig::preset(self.preset.into());
        let interval_secs = match self.interval {
            Some(minutes) => minutes.saturating_mul(60),
            None => preset.interval_secs(),
        };

        let config = ScheduleConfig::new(
            self.frequency.unwrap_or(preset.frequency_hz()),
            self.duration.unwrap_or(preset.duration_secs()),
            interval_secs,
            self.volume.unwrap_or(preset.volume()),
        )?;
        Ok(config)
    }
}

/// Renders one tone to `--export` if given. Returns whether it did.
#[cfg(feature = "wav-export")]
fn export(cli: &Cli, config: ScheduleConfig) -> Result<bool> {
    let Some(path) = &cli.export else {
        return Ok(false);
    };
    let scheduler = ToneScheduler::new(config, keepalive_tone::WavOutput::new(path));
    scheduler
        .test_tone()
        .with_context(|| format!("could not export tone to {}", path.display()))?;
    Ok(true)
}

#[cfg(not(feature = "wav-export"))]
fn export(_cli: &Cli, _config: ScheduleConfig) -> Result<bool> {
    Ok(false)
}

/// How a `--test` run ended.
#[derive(Debug, PartialEq, Eq)]
enum TestOutcome {
    Played,
    Interrupted,
}

/// Plays one tone on a helper thread and waits for it or for an interrupt,
/// whichever comes first.
fn play_test_tone<O: AudioOutput>(
    scheduler: ToneScheduler<O>,
    interrupted: &Receiver<()>,
) -> Result<TestOutcome> {
    let (done, finished) = bounded(1);
    thread::Builder::new()
        .name("test-tone".to_string())
        .spawn(move || {
            let _ = done.send(scheduler.test_tone());
        })
        .context("could not start test tone")?;

    select! {
        recv(finished) -> result => {
            result.map_err(|_| anyhow!("test tone thread exited without a result"))??;
            Ok(TestOutcome::Played)
        }
        recv(*interrupted) -> _ => Ok(TestOutcome::Interrupted),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.schedule_config()?;

    let (interrupt, interrupted) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = interrupt.try_send(());
    })
    .context("could not install interrupt handler")?;

    if export(&cli, config)? {
        return Ok(());
    }

    if cli.test {
        info!("test mode: playing one tone ({config})");
        let scheduler = ToneScheduler::new(config, DeviceOutput::new());
        match play_test_tone(scheduler, &interrupted).context("test tone failed")? {
            TestOutcome::Played => info!("test successful, tone played"),
            TestOutcome::Interrupted => info!("interrupted, abandoning test tone"),
        }
        return Ok(());
    }

    let mut scheduler = ToneScheduler::new(config, DeviceOutput::new());
    info!("keeping monitors awake: {config}; press Ctrl+C to stop");
    scheduler.start()?;

    loop {
        match interrupted.recv_timeout(STATUS_EVERY) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                info!(
                    "next tone: {}",
                    scheduler.status().countdown(Instant::now())
                );
            }
        }
    }

    info!("interrupted, stopping");
    scheduler.stop();
    Ok(())
}
