//! Output that makes no sound: for machines without an audio device.
//!
//! Instances measure their elapsed time on the wall clock, so the player's
//! ring-out and fade timing behaves exactly as with a real device.

use std::time::{Duration, Instant};

use crate::playback::{AudioInstance, AudioOutput, OutputError};
use crate::theory::SampleKey;

#[derive(Debug, Default)]
pub struct SilentOutput {
    started: usize,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances started so far.
    pub fn started(&self) -> usize {
        self.started
    }
}

#[derive(Debug)]
pub struct SilentInstance {
    start: Instant,
    stopped: Option<Duration>,
    volume: f32,
}

impl SilentInstance {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_paused(&self) -> bool {
        self.stopped.is_some()
    }
}

impl AudioInstance for SilentInstance {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn pause(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.start.elapsed());
        }
    }

    fn elapsed_seconds(&self) -> f64 {
        self.stopped
            .unwrap_or_else(|| self.start.elapsed())
            .as_secs_f64()
    }

    fn has_stopped(&self) -> bool {
        self.is_paused()
    }
}

impl AudioOutput for SilentOutput {
    type Instance = SilentInstance;

    fn play(&mut self, _key: &SampleKey, volume: f32) -> Result<SilentInstance, OutputError> {
        self.started += 1;
        Ok(SilentInstance {
            start: Instant::now(),
            stopped: None,
            volume: volume.clamp(0.0, 1.0),
        })
    }
}
