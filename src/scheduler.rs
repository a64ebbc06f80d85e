//! The tone scheduler: plays the keep-alive tone on a repeating interval.
//!
//! A scheduler is a two-state machine. It starts `Stopped`; `start` spawns a
//! single worker thread and moves it to `Running`, `stop` cancels that worker
//! and returns without waiting for it. Front ends (the CLI, a tray icon) only ever call `start`,
//! `stop`, `test_tone` and `status`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::{debug, error, info, warn};

use crate::config::{SAMPLE_RATE, ScheduleConfig};
use crate::error::{Error, Result};
use crate::output::AudioOutput;
use crate::waveform::Waveform;

/// Longest the worker sleeps before checking whether it was stopped.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of the scheduler's state for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    pub running: bool,
    /// When the next tone is due. Always `None` while stopped, and `None`
    /// while running until the first tone has been played.
    pub next_fire_time: Option<Instant>,
}

impl RunState {
    /// Time left until the next tone, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_fire_time.map(|at| at.saturating_duration_since(now))
    }

    /// Short human-readable countdown for a status line.
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use keepalive_tone::RunState;
    ///
    /// let now = Instant::now();
    /// let state = RunState {
    ///     running: true,
    ///     next_fire_time: Some(now + Duration::from_secs(125)),
    /// };
    /// assert_eq!(state.countdown(now), "02:05");
    /// assert_eq!(RunState::default().countdown(now), "--");
    /// ```
    pub fn countdown(&self, now: Instant) -> String {
        if !self.running {
            return "--".to_string();
        }
        match self.remaining(now) {
            None => "soon".to_string(),
            Some(left) if left.is_zero() => "playing".to_string(),
            Some(left) => {
                let secs = left.as_secs();
                format!("{:02}:{:02}", secs / 60, secs % 60)
            }
        }
    }
}

/// The running worker and the channel used to wake it for cancellation.
struct Worker {
    handle: JoinHandle<()>,
    cancel: Sender<()>,
}

/// Plays the configured tone every interval on a background thread.
///
/// # Examples
///
/// ```no_run
/// use keepalive_tone::{DeviceOutput, ScheduleConfig, ToneScheduler};
///
/// let mut scheduler = ToneScheduler::new(ScheduleConfig::default(), DeviceOutput::new());
/// scheduler.start().unwrap();
/// assert!(scheduler.status().running);
/// scheduler.stop();
/// ```
pub struct ToneScheduler<O: AudioOutput> {
    config: ScheduleConfig,
    output: Arc<Mutex<O>>,
    state: Arc<Mutex<RunState>>,
    worker: Option<Worker>,
    /// A cancelled worker that may still be finishing its tone.
    retired: Option<JoinHandle<()>>,
}

impl<O: AudioOutput> ToneScheduler<O> {
    /// Creates a stopped scheduler that will play through `output`.
    pub fn new(config: ScheduleConfig, output: O) -> Self {
        Self {
            config,
            output: Arc::new(Mutex::new(output)),
            state: Arc::new(Mutex::new(RunState::default())),
            worker: None,
            retired: None,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Starts playing the tone on a repeating schedule.
    ///
    /// The first tone plays immediately. Fails with `Error::AlreadyRunning`
    /// if a worker is already active; no second worker is ever created.
    /// A worker cancelled by an earlier `stop` is joined first, so this may
    /// wait for its last tone to end.
    pub fn start(&mut self) -> Result<()> {
        match self.worker.take() {
            Some(worker) if lock(&self.state).running => {
                self.worker = Some(worker);
                warn!("start requested while already running");
                return Err(Error::AlreadyRunning);
            }
            // the worker panicked and marked itself stopped
            Some(worker) => join(worker.handle),
            None => {}
        }
        self.join_retired();

        let (cancel, cancelled) = bounded(1);
        let context = WorkerContext {
            config: self.config,
            output: Arc::clone(&self.output),
            state: Arc::clone(&self.state),
            cancelled,
        };

        lock(&self.state).running = true;

        let spawned = thread::Builder::new()
            .name("keepalive".to_string())
            .spawn(move || context.run());

        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker { handle, cancel });
                info!("started: {}", self.config);
                Ok(())
            }
            Err(e) => {
                *lock(&self.state) = RunState::default();
                Err(Error::Spawn(e))
            }
        }
    }

    /// Stops the schedule.
    ///
    /// Returns at once. A sleeping worker wakes and exits; a tone that is
    /// already playing finishes in the background and nothing is scheduled
    /// after it. A no-op when not running.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        *lock(&self.state) = RunState::default();
        let _ = worker.cancel.try_send(());
        drop(worker.cancel);

        self.retired = Some(worker.handle);
        info!("stopped");
    }

    fn join_retired(&mut self) {
        if let Some(handle) = self.retired.take() {
            join(handle);
        }
    }

    /// Plays a single tone right now, outside the schedule.
    ///
    /// Does not touch the run state. If the schedule is playing a tone at the
    /// same moment, this waits for it to finish first.
    pub fn test_tone(&self) -> Result<()> {
        play_once(&self.config, &self.output)
    }

    /// Returns the current run state.
    pub fn status(&self) -> RunState {
        *lock(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.status().running
    }
}

impl<O: AudioOutput> Drop for ToneScheduler<O> {
    fn drop(&mut self) {
        self.stop();
        self.join_retired();
    }
}

/// Everything the worker thread owns.
struct WorkerContext<O: AudioOutput> {
    config: ScheduleConfig,
    output: Arc<Mutex<O>>,
    state: Arc<Mutex<RunState>>,
    cancelled: Receiver<()>,
}

impl<O: AudioOutput> WorkerContext<O> {
    fn run(self) {
        let _reset = ResetOnPanic(&*self.state);
        loop {
            if !lock(&self.state).running {
                break;
            }

            if let Err(e) = play_once(&self.config, &self.output) {
                error!("tone failed, retrying next interval: {e}");
            }

            let due = Instant::now() + self.config.interval();
            {
                let mut state = lock(&self.state);
                if !state.running {
                    break;
                }
                state.next_fire_time = Some(due);
            }
            debug!("next tone in {}s", self.config.interval_secs());

            if !self.sleep_until(due) {
                break;
            }
        }
        debug!("scheduler thread exiting");
    }

    /// Sleeps in steps of at most `POLL_INTERVAL`. Returns `false` as soon
    /// as the scheduler is stopped.
    fn sleep_until(&self, due: Instant) -> bool {
        loop {
            let now = Instant::now();
            if now >= due {
                return true;
            }
            let step = (due - now).min(POLL_INTERVAL);
            match self.cancelled.recv_timeout(step) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return false,
                Err(RecvTimeoutError::Timeout) => {
                    if !lock(&self.state).running {
                        return false;
                    }
                }
            }
        }
    }
}

/// Marks the scheduler stopped if the worker unwinds, so the run state never
/// reports a schedule that has no thread behind it.
struct ResetOnPanic<'a>(&'a Mutex<RunState>);

impl Drop for ResetOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            *lock(self.0) = RunState::default();
            error!("scheduler thread panicked, schedule stopped");
        }
    }
}

fn join(handle: JoinHandle<()>) {
    // a panic was already reported by ResetOnPanic
    let _ = handle.join();
}

/// Synthesizes the configured tone and plays it, holding the output for the
/// whole playback so two tones never overlap on the device.
fn play_once<O: AudioOutput>(config: &ScheduleConfig, output: &Mutex<O>) -> Result<()> {
    let waveform = Waveform::from_config::<SAMPLE_RATE>(config);
    let mut output = lock(output);
    output.play(&waveform)?;
    info!(
        "played {} Hz tone for {}s",
        config.frequency_hz(),
        config.duration_secs()
    );
    Ok(())
}

/// A panic while holding one of these locks cannot leave the guarded data
/// half-written, so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
