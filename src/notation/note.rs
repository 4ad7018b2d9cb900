//! Notes: a chord of pitches (or a single rest marker) with a duration.

use std::fmt;
use std::str::FromStr;

use crate::theory::{Duration, Pitch};

use super::NotationError;

/// One musical event on the stave.
///
/// Invariant: `pitches` is non-empty, and a rest is exactly one `Pitch::Rest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    pitches: Vec<Pitch>,
    duration: Duration,
}

impl Note {
    /// Build a note, checking the pitch set.
    ///
    /// Repeated pitches in a chord are kept as given.
    pub fn new(pitches: Vec<Pitch>, duration: Duration) -> Result<Self, NotationError> {
        if pitches.is_empty() {
            return Err(NotationError::InvalidNote("empty pitch set".into()));
        }
        if pitches.len() > 1 && pitches.iter().any(Pitch::is_rest) {
            return Err(NotationError::InvalidNote(
                "a rest cannot be part of a chord".into(),
            ));
        }
        Ok(Self { pitches, duration })
    }

    /// A single pitch, or a rest when `pitch` is `Pitch::Rest`.
    pub fn single(pitch: Pitch, duration: Duration) -> Self {
        Self {
            pitches: vec![pitch],
            duration,
        }
    }

    pub fn rest(duration: Duration) -> Self {
        Self::single(Pitch::Rest, duration)
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_rest(&self) -> bool {
        self.pitches[0].is_rest()
    }

    /// Whether any pitch of the chord needs a sharp sign.
    pub fn has_sharp(&self) -> bool {
        self.pitches.iter().any(Pitch::is_sharp)
    }

    /// Same pitches, new duration.
    pub fn with_duration(&self, duration: Duration) -> Self {
        Self {
            pitches: self.pitches.clone(),
            duration,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pitch) in self.pitches.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{pitch}")?;
        }
        write!(f, ":{}", self.duration)
    }
}

/// Text form `<pitch>[+<pitch>...]:<duration>`, e.g. `C4+E4+G4:q` or `r:hd`.
impl FromStr for Note {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pitches, duration) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| NotationError::InvalidNote(format!("{s:?} has no duration")))?;
        let duration = Duration::parse(duration)?;
        let pitches = pitches
            .split('+')
            .map(str::parse)
            .collect::<Result<Vec<Pitch>, _>>()?;
        Note::new(pitches, duration)
    }
}

/// Parse whitespace-separated notes.
pub fn parse_notes(text: &str) -> Result<Vec<Note>, NotationError> {
    text.split_whitespace().map(str::parse).collect()
}
