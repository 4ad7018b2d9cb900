//! Duration table: the one place a symbolic duration becomes a fraction of a whole note.
//!
//! Symbols are the stave's rhythm codes: `w`, `h`, `q`, `8`, `16`, `32`, each
//! optionally followed by `d` for the dotted value (1.5 × the base fraction).
//! Dotted values are derived, never stored.

use std::fmt;
use std::time::Duration as StdDuration;

use thiserror::Error;

/// A duration symbol that is not one of `32 16 8 q h w`, dotted or not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration code {0:?}")]
pub struct InvalidDurationCode(pub String);

/// Undotted rhythm value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationCode {
    ThirtySecond,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl DurationCode {
    /// Every code, shortest first.
    pub const ALL: [DurationCode; 6] = [
        DurationCode::ThirtySecond,
        DurationCode::Sixteenth,
        DurationCode::Eighth,
        DurationCode::Quarter,
        DurationCode::Half,
        DurationCode::Whole,
    ];

    /// Fraction of a whole note.
    pub fn fraction(self) -> f64 {
        1.0 / self.denominator() as f64
    }

    /// Note value denominator: 1 for a whole note, 4 for a quarter, 32 for a thirty-second.
    pub fn denominator(self) -> u32 {
        match self {
            DurationCode::ThirtySecond => 32,
            DurationCode::Sixteenth => 16,
            DurationCode::Eighth => 8,
            DurationCode::Quarter => 4,
            DurationCode::Half => 2,
            DurationCode::Whole => 1,
        }
    }

    /// The stave symbol (`"q"`, `"8"`, ...).
    pub fn symbol(self) -> &'static str {
        match self {
            DurationCode::ThirtySecond => "32",
            DurationCode::Sixteenth => "16",
            DurationCode::Eighth => "8",
            DurationCode::Quarter => "q",
            DurationCode::Half => "h",
            DurationCode::Whole => "w",
        }
    }

    /// Parse an undotted symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Whether the glyph carries a flag (eighth and shorter).
    pub fn is_flagged(self) -> bool {
        self.denominator() >= 8
    }

    /// Whether the note head is hollow (half and whole).
    pub fn is_hollow(self) -> bool {
        self.denominator() <= 2
    }
}

/// A rhythm value: base code plus dotted flag.
///
/// The table has no dotted whole note, so `{Whole, dotted}` cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    code: DurationCode,
    dotted: bool,
}

impl Duration {
    /// Build a duration, rejecting the dotted whole note.
    pub fn new(code: DurationCode, dotted: bool) -> Result<Self, InvalidDurationCode> {
        if dotted && code == DurationCode::Whole {
            return Err(InvalidDurationCode(format!("{}d", code.symbol())));
        }
        Ok(Self { code, dotted })
    }

    /// An undotted duration.
    pub fn plain(code: DurationCode) -> Self {
        Self {
            code,
            dotted: false,
        }
    }

    /// Parse a stave symbol such as `"q"` or `"8d"`.
    pub fn parse(symbol: &str) -> Result<Self, InvalidDurationCode> {
        let (base, dotted) = match symbol.strip_suffix('d') {
            Some(base) => (base, true),
            None => (symbol, false),
        };
        let code = DurationCode::from_symbol(base)
            .ok_or_else(|| InvalidDurationCode(symbol.to_string()))?;
        Self::new(code, dotted)
    }

    pub fn code(self) -> DurationCode {
        self.code
    }

    pub fn is_dotted(self) -> bool {
        self.dotted
    }

    /// Same base code with the dot toggled; a whole note stays undotted.
    pub fn toggle_dot(self) -> Self {
        Self::new(self.code, !self.dotted).unwrap_or(self)
    }

    /// Fraction of a whole note, 1.5× the base fraction when dotted.
    pub fn fraction(self) -> f64 {
        let base = self.code.fraction();
        if self.dotted {
            base * 1.5
        } else {
            base
        }
    }

    /// Nominal length when a whole note lasts `whole_note_seconds`.
    ///
    /// A tempo that gives no representable length (negative, NaN, huge)
    /// yields zero.
    pub fn seconds(self, whole_note_seconds: f64) -> StdDuration {
        StdDuration::try_from_secs_f64(self.fraction() * whole_note_seconds)
            .unwrap_or(StdDuration::ZERO)
    }

    /// The stave symbol, `d`-suffixed when dotted.
    pub fn symbol(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.symbol())?;
        if self.dotted {
            f.write_str("d")?;
        }
        Ok(())
    }
}

/// Fraction of a whole note for a stave symbol.
pub fn lookup(symbol: &str) -> Result<f64, InvalidDurationCode> {
    Duration::parse(symbol).map(Duration::fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn known_fractions() {
        assert_approx_eq!(lookup("q").unwrap(), 0.25);
        assert_approx_eq!(lookup("qd").unwrap(), 0.375);
        assert_approx_eq!(lookup("w").unwrap(), 1.0);
        assert_approx_eq!(lookup("hd").unwrap(), 0.75);
        assert_approx_eq!(lookup("32d").unwrap(), 1.0 / 32.0 + 1.0 / 64.0);
    }

    #[test]
    fn dotted_is_one_and_a_half_base() {
        for code in DurationCode::ALL
            .into_iter()
            .filter(|&c| c != DurationCode::Whole)
        {
            let base = lookup(code.symbol()).unwrap();
            let dotted = lookup(&format!("{}d", code.symbol())).unwrap();
            assert_approx_eq!(dotted, base * 1.5);
        }
    }

    #[test]
    fn rejects_unknown_symbols() {
        for bad in ["", "d", "x", "4", "wd", "wdd", "Q", "64"] {
            assert_eq!(lookup(bad), Err(InvalidDurationCode(bad.to_string())));
        }
    }

    #[test]
    fn parse_and_display_agree() {
        for symbol in ["32", "32d", "16", "16d", "8", "8d", "q", "qd", "h", "hd", "w"] {
            assert_eq!(Duration::parse(symbol).unwrap().to_string(), symbol);
        }
    }

    #[test]
    fn seconds_at_one_second_whole_note() {
        let quarter = Duration::plain(DurationCode::Quarter);
        assert_eq!(quarter.seconds(1.0), StdDuration::from_millis(250));
        let half = Duration::plain(DurationCode::Half);
        assert_eq!(half.seconds(2.0), StdDuration::from_secs(1));
    }

    #[test]
    fn unusable_tempo_gives_zero_length() {
        let quarter = Duration::plain(DurationCode::Quarter);
        assert_eq!(quarter.seconds(-1.0), StdDuration::ZERO);
        assert_eq!(quarter.seconds(f64::NAN), StdDuration::ZERO);
        assert_eq!(quarter.seconds(f64::INFINITY), StdDuration::ZERO);
    }

    #[test]
    fn dotted_whole_is_not_a_duration() {
        assert!(Duration::new(DurationCode::Whole, true).is_err());
        let whole = Duration::plain(DurationCode::Whole);
        assert_eq!(whole.toggle_dot(), whole);
        let quarter = Duration::plain(DurationCode::Quarter);
        assert!(quarter.toggle_dot().is_dotted());
        assert!(!quarter.toggle_dot().toggle_dot().is_dotted());
    }

    #[test]
    fn glyph_classes() {
        assert!(DurationCode::Eighth.is_flagged());
        assert!(!DurationCode::Quarter.is_flagged());
        assert!(DurationCode::Whole.is_hollow());
        assert!(!DurationCode::Quarter.is_hollow());
    }
}
