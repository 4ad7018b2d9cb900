//! Music primitives shared by notation and playback: durations, pitches, sample spelling.

pub mod duration;
pub mod enharmonic;
pub mod pitch;

pub use duration::{lookup, Duration, DurationCode, InvalidDurationCode};
pub use enharmonic::{normalize, sample_key, SampleKey, SampleSpelling};
pub use pitch::{Accidental, InvalidPitch, Letter, Pitch};
