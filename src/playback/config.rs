//! Playback tuning: tempo, volume, ring-out and fade.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PlaybackError;

/// Longest dotted duration as a multiple of a whole note.
const LONGEST_NOTE: f64 = 1.5;
/// Slowest accepted tempo: a whole note lasting an hour.
const MAX_WHOLE_NOTE_SECONDS: f64 = 3600.0;

/// Playback constants.
///
/// Notes ring for `ring_out_factor` × their nominal length while the scheduler
/// advances after 1×, so consecutive notes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Length of a whole note in seconds (1.0 makes a quarter note 250 ms).
    pub whole_note_seconds: f64,
    /// Volume of every new instance, in `[0, 1]`.
    pub volume: f32,
    pub ring_out_factor: f64,
    /// Fade window once a note's ring-out ends, in milliseconds.
    pub fade_out_ms: u64,
}

impl PlaybackConfig {
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    /// Reject values that cannot be turned into note lengths and cutoffs.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        let whole = self.whole_note_seconds;
        if !(whole > 0.0 && whole <= MAX_WHOLE_NOTE_SECONDS) {
            return Err(PlaybackError::InvalidTempo(whole));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::InvalidVolume(self.volume));
        }
        let factor = self.ring_out_factor;
        if !factor.is_finite() || factor < 0.0 || !(whole * LONGEST_NOTE * factor).is_finite() {
            return Err(PlaybackError::InvalidRingOut(factor));
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            whole_note_seconds: 1.0,
            volume: 0.5,
            ring_out_factor: 2.0,
            fade_out_ms: 120,
        }
    }
}
