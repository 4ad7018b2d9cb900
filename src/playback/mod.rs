//! Playback: the melody scheduler, live keys and fade-out watchers.

pub mod clock;
pub mod config;
pub mod output;
pub mod player;
pub mod registry;
pub mod watcher;

use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PlaybackConfig;
pub use output::{AudioInstance, AudioOutput, OutputError};
pub use player::{PlayState, Player};
pub use registry::{InstanceId, Registry};
pub use watcher::{FadeWatcher, WatchStatus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("volume {0} outside [0, 1]")]
    InvalidVolume(f32),
    #[error("whole note length {0} s must be a positive number")]
    InvalidTempo(f64),
    #[error("ring-out factor {0} must be a non-negative number")]
    InvalidRingOut(f64),
}
