//! Sample data: WAV decoding, mono mixdown and linear resampling.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV file contains no samples")]
    Empty,
}

/// A mono sample buffer at a known rate.
///
/// The frames sit behind an `Arc` so every sounding voice shares one copy.
#[derive(Debug, Clone)]
pub struct SampleData {
    frames: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleData {
    pub fn from_mono(frames: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            frames: frames.into(),
            sample_rate,
        }
    }

    /// Decode a WAV stream to mono f32 at `target_rate`.
    ///
    /// Integer and float formats are accepted. Channels are averaged, and a
    /// differing source rate is converted by linear interpolation.
    pub fn from_wav<R: Read + Seek>(reader: R, target_rate: u32) -> Result<Self, SampleError> {
        let wav = hound::WavReader::new(reader)?;
        let spec = wav.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Float => wav.into_samples::<f32>().collect::<Result<_, _>>()?,
        };
        if interleaved.is_empty() {
            return Err(SampleError::Empty);
        }

        let mono: Vec<f32> = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        let frames = if spec.sample_rate == target_rate {
            mono
        } else {
            resample_linear(&mono, spec.sample_rate, target_rate)
        };
        Ok(Self::from_mono(frames, target_rate))
    }

    pub fn from_path(path: &Path, target_rate: u32) -> Result<Self, SampleError> {
        let file = File::open(path)?;
        Self::from_wav(BufReader::new(file), target_rate)
    }

    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    /// Another handle on the same frames.
    pub fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.frames)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in seconds.
    pub fn seconds(&self) -> f64 {
        self.frames.len() as f64 / f64::from(self.sample_rate.max(1))
    }
}

fn resample_linear(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    match input {
        [] => return Vec::new(),
        [only] => return vec![*only],
        _ => {}
    }

    let step = f64::from(source_rate) / f64::from(target_rate);
    let out_len = (input.len() as f64 / step).ceil() as usize;
    let last = input.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            if idx >= last {
                return input[last];
            }
            let frac = (pos - idx as f64) as f32;
            input[idx] * (1.0 - frac) + input[idx + 1] * frac
        })
        .collect()
}
