//! The audio-output capability the player drives.

use thiserror::Error;

use crate::theory::SampleKey;

/// Why a sound could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    #[error("no sample named {0}")]
    UnknownSample(String),
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

/// One sounding sample.
pub trait AudioInstance {
    /// Set the instance volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    /// Stop producing sound; the instance is not resumed afterwards.
    fn pause(&mut self);

    /// Seconds of sound produced since the instance started.
    fn elapsed_seconds(&self) -> f64;

    /// The output stopped this instance on its own (it was refused or
    /// dropped). Its watcher releases it without waiting for a cutoff.
    fn has_stopped(&self) -> bool {
        false
    }
}

/// Starts sounding instances by sample key.
pub trait AudioOutput {
    type Instance: AudioInstance;

    fn play(&mut self, key: &SampleKey, volume: f32) -> Result<Self::Instance, OutputError>;
}
