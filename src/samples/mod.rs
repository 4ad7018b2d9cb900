//! Samples: decoded WAV data, the bank keyed by sample name, and synthesized
//! fallback tones.

pub mod bank;
pub mod sample;
pub mod synth;

pub use bank::SampleBank;
pub use sample::{SampleData, SampleError};
pub use synth::piano_tone;
