//! Voices: one sounding sample each, shared between the control thread and
//! the audio thread through atomics.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::playback::AudioInstance;

/// Per-voice state both threads can touch without locking.
#[derive(Debug)]
pub struct VoiceState {
    volume: AtomicU32,
    paused: AtomicBool,
    frames: AtomicU64,
}

impl VoiceState {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: AtomicU32::new(volume.clamp(0.0, 1.0).to_bits()),
            paused: AtomicBool::new(false),
            frames: AtomicU64::new(0),
        }
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Frames rendered so far, counting silence past the end of the sample.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    fn add_frames(&self, n: u64) {
        self.frames.fetch_add(n, Ordering::Relaxed);
    }
}

/// Audio-thread side of a voice.
pub struct Voice {
    frames: Arc<[f32]>,
    position: usize,
    state: Arc<VoiceState>,
}

impl Voice {
    pub fn new(frames: Arc<[f32]>, state: Arc<VoiceState>) -> Self {
        Self {
            frames,
            position: 0,
            state,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Stop the voice from the audio side; the handle sees it as stopped.
    pub fn pause(&self) {
        self.state.pause();
    }

    /// Add this voice into `out` (interleaved, `channels` wide).
    ///
    /// After the last frame the voice stays alive and keeps counting time
    /// until the control side pauses it.
    pub fn mix_into(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let frame_count = out.len() / channels;
        let volume = self.state.volume();

        let remaining = self.frames.len().saturating_sub(self.position);
        let audible = frame_count.min(remaining);
        for (frame, &s) in out
            .chunks_exact_mut(channels)
            .zip(&self.frames[self.position..self.position + audible])
        {
            for slot in frame {
                *slot += s * volume;
            }
        }
        self.position += audible;
        self.state.add_frames(frame_count as u64);
    }
}

/// Control-thread side of a voice: the player's audio instance.
#[derive(Debug, Clone)]
pub struct VoiceHandle {
    state: Arc<VoiceState>,
    sample_rate: u32,
}

impl VoiceHandle {
    pub fn new(state: Arc<VoiceState>, sample_rate: u32) -> Self {
        Self { state, sample_rate }
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }
}

impl AudioInstance for VoiceHandle {
    fn set_volume(&mut self, volume: f32) {
        self.state.set_volume(volume);
    }

    fn pause(&mut self) {
        self.state.pause();
    }

    fn elapsed_seconds(&self) -> f64 {
        self.state.frames() as f64 / f64::from(self.sample_rate.max(1))
    }

    fn has_stopped(&self) -> bool {
        self.state.is_paused()
    }
}
