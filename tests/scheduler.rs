use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use keepalive_tone::{
    AudioOutput, Error, PlaybackError, SAMPLE_RATE, ScheduleConfig, ToneScheduler, Waveform,
};

/// What a `RecordingOutput` saw, shared with the test after the output moves
/// into the scheduler.
#[derive(Default)]
struct Recording {
    plays: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    waveforms: Mutex<Vec<(usize, u32)>>,
}

impl Recording {
    fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

struct RecordingOutput {
    recording: Arc<Recording>,
    delay: Duration,
    fail: bool,
}

impl RecordingOutput {
    fn new() -> (Self, Arc<Recording>) {
        let recording = Arc::new(Recording::default());
        let output = Self {
            recording: Arc::clone(&recording),
            delay: Duration::ZERO,
            fail: false,
        };
        (output, recording)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl AudioOutput for RecordingOutput {
    fn play(&mut self, waveform: &Waveform) -> Result<(), PlaybackError> {
        let active = self.recording.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.recording.max_active.fetch_max(active, Ordering::SeqCst);

        self.recording
            .waveforms
            .lock()
            .unwrap()
            .push((waveform.len(), waveform.sample_rate()));
        thread::sleep(self.delay);

        self.recording.active.fetch_sub(1, Ordering::SeqCst);
        self.recording.plays.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            Err(PlaybackError::NoOutputDevice)
        } else {
            Ok(())
        }
    }
}

/// An output whose device call blows up.
struct PanickingOutput;

impl AudioOutput for PanickingOutput {
    fn play(&mut self, _waveform: &Waveform) -> Result<(), PlaybackError> {
        panic!("device driver crashed");
    }
}

fn short_config(interval_secs: u64) -> ScheduleConfig {
    ScheduleConfig::new(50.0, 0.01, interval_secs, 0.8).unwrap()
}

/// Polls `condition` until it holds or `timeout` passes.
fn wait_for(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_starts_stopped() {
    let (output, recording) = RecordingOutput::new();
    let scheduler = ToneScheduler::new(short_config(60), output);

    let state = scheduler.status();
    assert!(!state.running);
    assert_eq!(state.next_fire_time, None);
    assert_eq!(recording.plays(), 0);
}

#[test]
fn test_stop_does_not_wait_for_playing_tone() {
    let config = ScheduleConfig::new(50.0, 3.0, 1500, 0.8).unwrap();
    let (output, recording) = RecordingOutput::new();
    let output = output.with_delay(Duration::from_secs(3));
    let mut scheduler = ToneScheduler::new(config, output);

    scheduler.start().unwrap();
    assert!(scheduler.status().running);
    thread::sleep(Duration::from_millis(100));

    let stop_called = Instant::now();
    scheduler.stop();
    assert!(stop_called.elapsed() < Duration::from_secs(1));

    let state = scheduler.status();
    assert!(!state.running);
    assert_eq!(state.next_fire_time, None);
    assert!(recording.plays() <= 1);

    // the tone in flight still ends, and nothing follows it
    assert!(wait_for(Duration::from_secs(5), || recording.plays() == 1));
    thread::sleep(Duration::from_millis(200));
    assert_eq!(recording.plays(), 1);
    assert!(!scheduler.status().running);
}

#[test]
fn test_restart_waits_for_cancelled_tone() {
    let (output, recording) = RecordingOutput::new();
    let output = output.with_delay(Duration::from_millis(500));
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || {
        recording.active.load(Ordering::SeqCst) == 1
    }));
    scheduler.stop();
    scheduler.start().unwrap();

    assert!(wait_for(Duration::from_secs(3), || recording.plays() == 2));
    assert_eq!(recording.max_active.load(Ordering::SeqCst), 1);
    assert!(scheduler.status().running);
    scheduler.stop();
}

#[test]
fn test_worker_panic_marks_scheduler_stopped() {
    let mut scheduler = ToneScheduler::new(short_config(60), PanickingOutput);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || !scheduler.status().running));
    assert_eq!(scheduler.status().next_fire_time, None);

    // the dead worker does not block a fresh start
    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || !scheduler.status().running));
    scheduler.stop();
}

#[test]
fn test_scheduled_tone_has_expected_length() {
    let config = ScheduleConfig::new(50.0, 3.0, 1500, 0.8).unwrap();
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(config, output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(5), || recording.plays() == 1));
    scheduler.stop();

    let waveforms = recording.waveforms.lock().unwrap();
    assert_eq!(waveforms[0], (132_300, SAMPLE_RATE));
}

#[test]
fn test_second_start_is_rejected() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.start().unwrap();
    assert!(matches!(scheduler.start(), Err(Error::AlreadyRunning)));

    assert!(wait_for(Duration::from_secs(2), || recording.plays() >= 1));
    thread::sleep(Duration::from_millis(200));
    // A second worker would have played its own first tone by now
    assert_eq!(recording.plays(), 1);
    assert!(scheduler.status().running);

    scheduler.stop();
}

#[test]
fn test_next_fire_time_set_after_first_tone() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    let before = Instant::now();
    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || {
        scheduler.status().next_fire_time.is_some()
    }));

    let state = scheduler.status();
    let next = state.next_fire_time.unwrap();
    assert!(next >= before + Duration::from_secs(60));
    assert!(next <= Instant::now() + Duration::from_secs(60));
    assert_eq!(recording.plays(), 1);

    let remaining = state.remaining(Instant::now()).unwrap();
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(55));

    scheduler.stop();
    assert_eq!(scheduler.status().next_fire_time, None);
}

#[test]
fn test_repeats_every_interval() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(1), output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(4), || recording.plays() >= 3));
    scheduler.stop();
}

#[test]
fn test_playback_failure_keeps_schedule_running() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(1), output.failing());

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(4), || recording.plays() >= 2));
    assert!(scheduler.status().running);

    scheduler.stop();
    assert!(!scheduler.status().running);
}

#[test]
fn test_stop_when_stopped_is_noop() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.status().running);
    assert_eq!(recording.plays(), 0);
}

#[test]
fn test_restart_after_stop() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || recording.plays() == 1));
    scheduler.stop();

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || recording.plays() == 2));
    assert!(scheduler.status().running);
    scheduler.stop();
}

#[test]
fn test_test_tone_while_stopped() {
    let (output, recording) = RecordingOutput::new();
    let scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.test_tone().unwrap();

    assert_eq!(recording.plays(), 1);
    assert!(!scheduler.status().running);
    assert_eq!(scheduler.status().next_fire_time, None);
}

#[test]
fn test_test_tone_reports_failure() {
    let (output, recording) = RecordingOutput::new();
    let scheduler = ToneScheduler::new(short_config(60), output.failing());

    let result = scheduler.test_tone();
    assert!(matches!(
        result,
        Err(Error::Playback(PlaybackError::NoOutputDevice))
    ));
    assert_eq!(recording.plays(), 1);
    assert!(!scheduler.status().running);
}

#[test]
fn test_test_tone_never_overlaps_scheduled_tone() {
    let (output, recording) = RecordingOutput::new();
    let output = output.with_delay(Duration::from_millis(200));
    let mut scheduler = ToneScheduler::new(short_config(60), output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || {
        recording.active.load(Ordering::SeqCst) == 1
    }));
    scheduler.test_tone().unwrap();
    scheduler.stop();

    assert_eq!(recording.plays(), 2);
    assert_eq!(recording.max_active.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_stops_worker() {
    let (output, recording) = RecordingOutput::new();
    let mut scheduler = ToneScheduler::new(short_config(1), output);

    scheduler.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || recording.plays() >= 1));
    drop(scheduler);

    let after_drop = recording.plays();
    thread::sleep(Duration::from_millis(1500));
    assert_eq!(recording.plays(), after_drop);
}

#[test]
fn test_invalid_config_rejected_before_playback() {
    let (_output, recording) = RecordingOutput::new();

    let result = ScheduleConfig::new(-5.0, 3.0, 1500, 0.8);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert_eq!(recording.plays(), 0);
}
