//! Enharmonic spelling for sample lookup.
//!
//! Samples exist only under natural and flat names, so a sharp is respelled as
//! the flat of the next letter in `A B C D E F G` (`G#` becomes `Ab`). The
//! octave number is carried over untouched.

use std::fmt;
use std::str::FromStr;

use super::pitch::{Accidental, InvalidPitch, Letter, Pitch};

/// Natural or flat spelling of a pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleSpelling {
    pub letter: Letter,
    pub flat: bool,
}

/// Name of a sample in the bank, e.g. `Db4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub spelling: SampleSpelling,
    pub octave: i8,
}

impl SampleSpelling {
    /// Semitones above C of the same octave; `Cb` is -1.
    pub fn semitone(self) -> i32 {
        let natural = match self.letter {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        };
        natural - i32::from(self.flat)
    }
}

impl SampleKey {
    /// Every natural and flat spelling in `octave`, `C` first.
    pub fn octave(octave: i8) -> impl Iterator<Item = SampleKey> {
        let order = [
            Letter::C,
            Letter::D,
            Letter::E,
            Letter::F,
            Letter::G,
            Letter::A,
            Letter::B,
        ];
        order.into_iter().flat_map(move |letter| {
            [false, true].into_iter().map(move |flat| SampleKey {
                spelling: SampleSpelling { letter, flat },
                octave,
            })
        })
    }

    /// MIDI note number (`A4` = 69).
    pub fn midi_number(&self) -> i32 {
        (i32::from(self.octave) + 1) * 12 + self.spelling.semitone()
    }

    /// Equal-tempered frequency in Hz.
    pub fn frequency(&self) -> f64 {
        440.0 * 2f64.powf(f64::from(self.midi_number() - 69) / 12.0)
    }
}

impl fmt::Display for SampleSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        if self.flat {
            f.write_str("b")?;
        }
        Ok(())
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.spelling, self.octave)
    }
}

/// Parses the file-stem form, `Db4` or `E5`.
impl FromStr for SampleKey {
    type Err = InvalidPitch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPitch(s.to_string());
        let mut chars = s.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(invalid)?;
        let rest = chars.as_str();
        let (flat, octave) = match rest.strip_prefix('b') {
            Some(octave) => (true, octave),
            None => (false, rest),
        };
        let octave = octave.parse::<i8>().map_err(|_| invalid())?;
        Ok(SampleKey {
            spelling: SampleSpelling { letter, flat },
            octave,
        })
    }
}

/// Respell `letter` + `accidental` using naturals and flats only.
pub fn normalize(letter: Letter, accidental: Accidental) -> SampleSpelling {
    match accidental {
        Accidental::Natural => SampleSpelling {
            letter,
            flat: false,
        },
        Accidental::Sharp => SampleSpelling {
            letter: letter.next(),
            flat: true,
        },
    }
}

/// Sample key for a pitch; rests have none.
pub fn sample_key(pitch: &Pitch) -> Option<SampleKey> {
    match *pitch {
        Pitch::Rest => None,
        Pitch::Pitched {
            letter,
            accidental,
            octave,
        } => Some(SampleKey {
            spelling: normalize(letter, accidental),
            octave,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharps_become_flat_of_next_letter() {
        let expected = [
            (Letter::A, Letter::B),
            (Letter::B, Letter::C),
            (Letter::C, Letter::D),
            (Letter::D, Letter::E),
            (Letter::E, Letter::F),
            (Letter::F, Letter::G),
            (Letter::G, Letter::A),
        ];
        for (sharp, flat) in expected {
            assert_eq!(
                normalize(sharp, Accidental::Sharp),
                SampleSpelling {
                    letter: flat,
                    flat: true
                }
            );
        }
    }

    #[test]
    fn naturals_are_unchanged() {
        for letter in Letter::CYCLE {
            let s = normalize(letter, Accidental::Natural);
            assert_eq!(s.letter, letter);
            assert!(!s.flat);
        }
    }

    #[test]
    fn c_sharp_is_d_flat() {
        assert_eq!(normalize(Letter::C, Accidental::Sharp).to_string(), "Db");
    }

    #[test]
    fn sample_keys_keep_octave() {
        let key = sample_key(&Pitch::sharp(Letter::G, 4)).unwrap();
        assert_eq!(key.to_string(), "Ab4");
        let key = sample_key(&Pitch::natural(Letter::E, 5)).unwrap();
        assert_eq!(key.to_string(), "E5");
        assert!(sample_key(&Pitch::Rest).is_none());
    }

    #[test]
    fn b_sharp_keeps_its_octave_number() {
        let key = sample_key(&Pitch::sharp(Letter::B, 4)).unwrap();
        assert_eq!(key.to_string(), "Cb4");
    }

    #[test]
    fn file_stems_parse_back() {
        for stem in ["Db4", "E5", "Ab0", "Bb-1"] {
            let key: SampleKey = stem.parse().unwrap();
            assert_eq!(key.to_string(), stem);
        }
        assert!("H4".parse::<SampleKey>().is_err());
        assert!("D#4".parse::<SampleKey>().is_err());
        assert!("Db".parse::<SampleKey>().is_err());
    }

    #[test]
    fn a4_is_concert_pitch() {
        let a4: SampleKey = "A4".parse().unwrap();
        assert_eq!(a4.midi_number(), 69);
        assert!((a4.frequency() - 440.0).abs() < 1e-9);
        let db4: SampleKey = "Db4".parse().unwrap();
        assert_eq!(db4.midi_number(), 61);
    }

    #[test]
    fn an_octave_has_fourteen_spellings() {
        let keys: Vec<String> = SampleKey::octave(4).map(|k| k.to_string()).collect();
        assert_eq!(keys.len(), 14);
        assert_eq!(keys[0], "C4");
        assert_eq!(keys[1], "Cb4");
        assert_eq!(keys[13], "Bb4");
    }
}
