//! Recording audio output driven by a [`ManualClock`].

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use skrid::playback::{
    AudioInstance, AudioOutput, Clock, ManualClock, OutputError, PlaybackConfig, Player,
};
use skrid::theory::SampleKey;

/// One started instance as seen by the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Started {
    pub key: String,
    pub at: Duration,
    pub volume: f32,
    pub paused_at: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct Recording(Rc<RefCell<Vec<Started>>>);

impl Recording {
    pub fn all(&self) -> Vec<Started> {
        self.0.borrow().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|s| s.key.clone()).collect()
    }

    pub fn find(&self, key: &str) -> Started {
        self.0
            .borrow()
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .unwrap_or_else(|| panic!("{key} never started"))
    }
}

pub struct RecordingOutput {
    clock: ManualClock,
    recording: Recording,
    missing: HashSet<String>,
    stalled: bool,
}

impl RecordingOutput {
    pub fn new(clock: ManualClock) -> (Self, Recording) {
        let recording = Recording::default();
        let output = Self {
            clock,
            recording: recording.clone(),
            missing: HashSet::new(),
            stalled: false,
        };
        (output, recording)
    }

    /// Fail every request for `key`.
    pub fn without(mut self, key: &str) -> Self {
        self.missing.insert(key.to_string());
        self
    }

    /// Instances never produce sound time, as with a stalled stream.
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }
}

pub struct RecordedInstance {
    clock: ManualClock,
    recording: Recording,
    index: usize,
    stalled: bool,
}

impl AudioInstance for RecordedInstance {
    fn set_volume(&mut self, volume: f32) {
        self.recording.0.borrow_mut()[self.index].volume = volume;
    }

    fn pause(&mut self) {
        let now = self.clock.now();
        let mut all = self.recording.0.borrow_mut();
        all[self.index].paused_at.get_or_insert(now);
    }

    fn elapsed_seconds(&self) -> f64 {
        if self.stalled {
            return 0.0;
        }
        let all = self.recording.0.borrow();
        let started = &all[self.index];
        let end = started.paused_at.unwrap_or_else(|| self.clock.now());
        end.saturating_sub(started.at).as_secs_f64()
    }
}

impl AudioOutput for RecordingOutput {
    type Instance = RecordedInstance;

    fn play(&mut self, key: &SampleKey, volume: f32) -> Result<RecordedInstance, OutputError> {
        let name = key.to_string();
        if self.missing.contains(&name) {
            return Err(OutputError::UnknownSample(name));
        }
        let mut all = self.recording.0.borrow_mut();
        all.push(Started {
            key: name,
            at: self.clock.now(),
            volume,
            paused_at: None,
        });
        Ok(RecordedInstance {
            clock: self.clock.clone(),
            recording: self.recording.clone(),
            index: all.len() - 1,
            stalled: self.stalled,
        })
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn player() -> (Player<RecordingOutput, ManualClock>, ManualClock, Recording) {
    let clock = ManualClock::new();
    let (output, recording) = RecordingOutput::new(clock.clone());
    let player = Player::new(output, clock.clone(), PlaybackConfig::default());
    (player, clock, recording)
}

/// Tick every 5 ms until the clock reads `until`.
pub fn run_to(player: &mut Player<RecordingOutput, ManualClock>, clock: &ManualClock, until: Duration) {
    while clock.now() < until {
        clock.advance(ms(5));
        player.tick();
    }
}
