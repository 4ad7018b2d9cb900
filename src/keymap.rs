//! Computer keyboard → pitch mapping for the virtual piano.
//!
//! Two rows of an AZERTY keyboard play a bit more than an octave and a half
//! above the base octave; `b` enters a rest. QWERTY keys are first translated
//! to the AZERTY key at the same position.

use serde::{Deserialize, Serialize};

use crate::theory::{Accidental, Letter, Pitch};

/// Lowest and highest base octave the map can be moved to.
pub const OCTAVE_RANGE: (i8, i8) = (0, 7);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    #[default]
    Azerty,
    Qwerty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    layout: KeyboardLayout,
    base_octave: i8,
}

impl KeyMap {
    pub fn new(layout: KeyboardLayout, base_octave: i8) -> Self {
        Self {
            layout,
            base_octave: base_octave.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1),
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn base_octave(&self) -> i8 {
        self.base_octave
    }

    pub fn octave_up(&mut self) {
        self.base_octave = (self.base_octave + 1).min(OCTAVE_RANGE.1);
    }

    pub fn octave_down(&mut self) {
        self.base_octave = (self.base_octave - 1).max(OCTAVE_RANGE.0);
    }

    /// The pitch `key` plays, or `None` for an unmapped key.
    pub fn pitch_for(&self, key: char) -> Option<Pitch> {
        let key = key.to_lowercase().next()?;
        let key = match self.layout {
            KeyboardLayout::Azerty => key,
            KeyboardLayout::Qwerty => qwerty_to_azerty(key),
        };
        match azerty_key(key)? {
            Mapped::Rest => Some(Pitch::Rest),
            Mapped::Note(letter, accidental, offset) => Some(Pitch::Pitched {
                letter,
                accidental,
                octave: self.base_octave + offset,
            }),
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(KeyboardLayout::Azerty, 4)
    }
}

enum Mapped {
    Note(Letter, Accidental, i8),
    Rest,
}

fn azerty_key(key: char) -> Option<Mapped> {
    use Accidental::{Natural as N, Sharp as S};
    use Letter::*;

    let (letter, accidental, offset) = match key {
        'q' => (C, N, 0),
        'z' => (C, S, 0),
        's' => (D, N, 0),
        'e' => (D, S, 0),
        'd' => (E, N, 0),
        'f' => (F, N, 0),
        't' => (F, S, 0),
        'g' => (G, N, 0),
        'y' => (G, S, 0),
        'h' => (A, N, 0),
        'u' => (A, S, 0),
        'j' => (B, N, 0),
        'k' => (C, N, 1),
        'o' => (C, S, 1),
        'l' => (D, N, 1),
        'p' => (D, S, 1),
        'm' => (E, N, 1),
        'ù' => (F, N, 1),
        ')' => (F, S, 1),
        '*' => (G, N, 1),
        '$' => (G, S, 1),
        'b' => return Some(Mapped::Rest),
        _ => return None,
    };
    Some(Mapped::Note(letter, accidental, offset))
}

/// The AZERTY key at the position of a US QWERTY key.
pub fn qwerty_to_azerty(key: char) -> char {
    match key {
        'q' => 'a',
        'w' => 'z',
        'a' => 'q',
        'z' => 'w',
        ';' => 'm',
        '\'' => 'ù',
        '\\' => '*',
        'm' => ',',
        '[' => '^',
        ']' => '$',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azerty() -> KeyMap {
        KeyMap::new(KeyboardLayout::Azerty, 4)
    }

    #[test]
    fn lower_row_is_one_chromatic_octave() {
        let names: Vec<String> = "qzsedftgyhuj"
            .chars()
            .map(|k| azerty().pitch_for(k).unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            ["C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4"]
        );
    }

    #[test]
    fn upper_keys_continue_an_octave_up() {
        let names: Vec<String> = "kolpmù)*$"
            .chars()
            .map(|k| azerty().pitch_for(k).unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            ["C5", "C#5", "D5", "D#5", "E5", "F5", "F#5", "G5", "G#5"]
        );
    }

    #[test]
    fn b_is_a_rest_and_others_are_unmapped() {
        assert_eq!(azerty().pitch_for('b'), Some(Pitch::Rest));
        assert_eq!(azerty().pitch_for('x'), None);
        assert_eq!(azerty().pitch_for('1'), None);
    }

    #[test]
    fn shifted_letters_map_like_lowercase() {
        assert_eq!(azerty().pitch_for('Q'), azerty().pitch_for('q'));
    }

    #[test]
    fn qwerty_keys_are_translated() {
        let map = KeyMap::new(KeyboardLayout::Qwerty, 4);
        assert_eq!(map.pitch_for('a'), Some(Pitch::natural(Letter::C, 4)));
        assert_eq!(map.pitch_for('w'), Some(Pitch::sharp(Letter::C, 4)));
        assert_eq!(map.pitch_for(';'), Some(Pitch::natural(Letter::E, 5)));
        assert_eq!(map.pitch_for('\''), Some(Pitch::natural(Letter::F, 5)));
        assert_eq!(map.pitch_for('\\'), Some(Pitch::natural(Letter::G, 5)));
        assert_eq!(map.pitch_for(']'), Some(Pitch::sharp(Letter::G, 5)));
        // `q` lands on AZERTY `a`, which plays nothing
        assert_eq!(map.pitch_for('q'), None);
        assert_eq!(map.pitch_for('m'), None);
    }

    #[test]
    fn octave_moves_within_range() {
        let mut map = KeyMap::new(KeyboardLayout::Azerty, 7);
        map.octave_up();
        assert_eq!(map.base_octave(), 7);
        map.octave_down();
        assert_eq!(map.pitch_for('q'), Some(Pitch::natural(Letter::C, 6)));
        assert_eq!(KeyMap::new(KeyboardLayout::Azerty, -3).base_octave(), 0);
    }

    #[test]
    fn layout_names_in_yaml() {
        let layout: KeyboardLayout = serde_yaml::from_str("qwerty").unwrap();
        assert_eq!(layout, KeyboardLayout::Qwerty);
    }
}
