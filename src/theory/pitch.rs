//! Pitch names: letter, optional sharp, octave; or the rest marker.
//!
//! Text forms accepted: `C4`, `c#4`, `C#/4` (stave key style), `C#-1`, and `r`
//! for a rest. Octave numbering follows scientific pitch (C4 = middle C).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Text that does not name a pitch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pitch {0:?}")]
pub struct InvalidPitch(pub String);

/// Note letter, in the cyclic order `A B C D E F G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// The cycle used for enharmonic spelling.
    pub const CYCLE: [Letter; 7] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
    ];

    /// Position in [`Letter::CYCLE`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next letter in the cycle, `G` wraps to `A`.
    pub fn next(self) -> Self {
        Self::CYCLE[(self.index() + 1) % Self::CYCLE.len()]
    }

    /// Diatonic step above C within an octave (C = 0 ... B = 6).
    pub fn step_from_c(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
        }
    }
}

/// Accidentals the keyboard can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
}

/// A sounding pitch or the rest marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pitch {
    Rest,
    Pitched {
        letter: Letter,
        accidental: Accidental,
        octave: i8,
    },
}

impl Pitch {
    pub fn natural(letter: Letter, octave: i8) -> Self {
        Pitch::Pitched {
            letter,
            accidental: Accidental::Natural,
            octave,
        }
    }

    pub fn sharp(letter: Letter, octave: i8) -> Self {
        Pitch::Pitched {
            letter,
            accidental: Accidental::Sharp,
            octave,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Pitch::Rest)
    }

    pub fn is_sharp(&self) -> bool {
        matches!(
            self,
            Pitch::Pitched {
                accidental: Accidental::Sharp,
                ..
            }
        )
    }

    /// Same pitch moved by whole octaves.
    pub fn transposed_octaves(self, octaves: i8) -> Self {
        match self {
            Pitch::Rest => Pitch::Rest,
            Pitch::Pitched {
                letter,
                accidental,
                octave,
            } => Pitch::Pitched {
                letter,
                accidental,
                octave: octave.saturating_add(octaves),
            },
        }
    }

    /// Diatonic staff position counted in steps from C0; `None` for a rest.
    pub fn staff_step(&self) -> Option<i32> {
        match *self {
            Pitch::Rest => None,
            Pitch::Pitched { letter, octave, .. } => {
                Some(octave as i32 * 7 + letter.step_from_c())
            }
        }
    }

    /// Stave key form: lowercase letter, `#` when sharp, `/`, octave (`c#/4`), or `r`.
    pub fn stave_key(&self) -> String {
        match *self {
            Pitch::Rest => "r".to_string(),
            Pitch::Pitched {
                letter,
                accidental,
                octave,
            } => {
                let sharp = if accidental == Accidental::Sharp { "#" } else { "" };
                format!(
                    "{}{sharp}/{octave}",
                    letter.as_char().to_ascii_lowercase()
                )
            }
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Pitch::Rest => f.write_str("r"),
            Pitch::Pitched {
                letter,
                accidental,
                octave,
            } => {
                let sharp = if accidental == Accidental::Sharp { "#" } else { "" };
                write!(f, "{}{sharp}{octave}", letter.as_char())
            }
        }
    }
}

impl FromStr for Pitch {
    type Err = InvalidPitch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidPitch(s.to_string());
        let text = s.trim();
        if text.eq_ignore_ascii_case("r") {
            return Ok(Pitch::Rest);
        }

        let mut chars = text.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(err)?;
        let mut rest = chars.as_str();

        let accidental = match rest.strip_prefix('#') {
            Some(after) => {
                rest = after;
                Accidental::Sharp
            }
            None => Accidental::Natural,
        };
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let octave: i8 = rest.parse().map_err(|_| err())?;

        Ok(Pitch::Pitched {
            letter,
            accidental,
            octave,
        })
    }
}
