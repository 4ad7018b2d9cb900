//! Synthetic piano tones for running without a sample directory.
//!
//! Each tone is a handful of decaying partials plus a short seeded noise
//! burst for the hammer, so the same seed always yields the same bank.

use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::theory::SampleKey;

use super::bank::SampleBank;
use super::sample::SampleData;

/// Length of every synthesized tone.
pub const TONE_SECONDS: f64 = 2.5;

/// Relative level and decay rate (1/s) of the first partials.
const PARTIALS: [(f64, f64); 4] = [(1.0, 1.8), (0.45, 2.6), (0.2, 3.5), (0.08, 5.0)];

const HAMMER_SECONDS: f64 = 0.012;

/// Render the tone for `key` at `sample_rate`.
pub fn piano_tone(key: &SampleKey, sample_rate: u32, seed: u64) -> Vec<f32> {
    let freq = key.frequency();
    let rate = f64::from(sample_rate);
    let len = (rate * TONE_SECONDS) as usize;
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(key.midi_number() as u64));

    let norm: f64 = PARTIALS.iter().map(|(level, _)| level).sum();
    let nyquist = rate / 2.0;

    (0..len)
        .map(|i| {
            let t = i as f64 / rate;
            let attack = (t / 0.004).min(1.0);

            let body: f64 = PARTIALS
                .iter()
                .enumerate()
                .filter(|(n, _)| freq * (*n as f64 + 1.0) < nyquist)
                .map(|(n, (level, decay))| {
                    let harmonic = freq * (n as f64 + 1.0);
                    level * (-decay * t).exp() * (TAU * harmonic * t).sin()
                })
                .sum::<f64>()
                / norm;

            let hammer = if t < HAMMER_SECONDS {
                rng.gen_range(-1.0..1.0) * 0.15 * (1.0 - t / HAMMER_SECONDS)
            } else {
                0.0
            };

            (0.8 * attack * body + hammer) as f32
        })
        .collect()
}

impl SampleBank {
    /// A bank with a synthesized tone for every natural and flat spelling in
    /// `octaves`.
    pub fn synthesized(octaves: RangeInclusive<i8>, sample_rate: u32, seed: u64) -> Self {
        let mut bank = Self::new();
        for octave in octaves {
            for key in SampleKey::octave(octave) {
                let tone = piano_tone(&key, sample_rate, seed);
                bank.insert(key, SampleData::from_mono(tone, sample_rate));
            }
        }
        bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SampleKey {
        s.parse().unwrap()
    }

    #[test]
    fn tone_has_expected_length_and_range() {
        let tone = piano_tone(&key("A4"), 8000, 1);
        assert_eq!(tone.len(), 20000);
        assert!(tone.iter().all(|s| s.abs() <= 1.0));
        assert!(tone.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn tone_decays() {
        let tone = piano_tone(&key("C4"), 8000, 1);
        let peak = |w: &[f32]| w.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak(&tone[..800]) > 4.0 * peak(&tone[tone.len() - 800..]));
    }

    #[test]
    fn same_seed_same_tone() {
        assert_eq!(
            piano_tone(&key("Eb4"), 8000, 7),
            piano_tone(&key("Eb4"), 8000, 7)
        );
        assert_ne!(
            piano_tone(&key("Eb4"), 8000, 7),
            piano_tone(&key("Eb4"), 8000, 8)
        );
    }

    #[test]
    fn bank_covers_requested_octaves() {
        let bank = SampleBank::synthesized(3..=4, 4000, 0);
        assert_eq!(bank.len(), 28);
        assert!(bank.contains(&key("Db3")));
        assert!(bank.contains(&key("B4")));
        assert!(!bank.contains(&key("C5")));
    }
}
