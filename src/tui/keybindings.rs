//! Key bindings: maps key events to application actions.
//!
//! Letter and punctuation keys belong to the virtual piano, so every editing
//! command sits on digits, arrows or editing keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::keymap::KeyMap;
use crate::theory::{DurationCode, Pitch};

/// Application-level actions triggered by key events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Start playing, or stop at the next note boundary.
    TogglePlayback,
    /// Append a note (or rest) with the selected duration.
    Note(Pitch),
    RemoveLast,
    ClearAll,
    /// Duration used for notes entered from now on.
    SelectDuration(DurationCode),
    ToggleDot,
    /// Give the last note the selected duration.
    ApplyDurationToLast,
    OctaveUp,
    OctaveDown,
    VolumeUp,
    VolumeDown,
    ToggleHelp,
    HelpScrollUp,
    HelpScrollDown,
    /// Close the help overlay.
    Escape,
}

fn duration_for_digit(c: char) -> Option<DurationCode> {
    match c {
        '1' => Some(DurationCode::Whole),
        '2' => Some(DurationCode::Half),
        '3' => Some(DurationCode::Quarter),
        '4' => Some(DurationCode::Eighth),
        '5' => Some(DurationCode::Sixteenth),
        '6' => Some(DurationCode::ThirtySecond),
        _ => None,
    }
}

/// Map a key event to an action.
///
/// While the help overlay is open only closing keys and Ctrl-Q act.
pub fn map_key(key: KeyEvent, keymap: &KeyMap, help_visible: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::Escape),
            KeyCode::Up => Some(Action::HelpScrollUp),
            KeyCode::Down => Some(Action::HelpScrollDown),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') => Some(Action::TogglePlayback),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('.') => Some(Action::ToggleDot),
        KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') => Some(Action::VolumeDown),
        KeyCode::Char(c @ '1'..='6') => duration_for_digit(c).map(Action::SelectDuration),
        KeyCode::F(n @ 1..=6) => {
            duration_for_digit(char::from(b'0' + n)).map(Action::SelectDuration)
        }
        KeyCode::Char(c) => keymap.pitch_for(c).map(Action::Note),
        KeyCode::Backspace => Some(Action::RemoveLast),
        KeyCode::Delete => Some(Action::ClearAll),
        KeyCode::Enter => Some(Action::ApplyDurationToLast),
        KeyCode::Up => Some(Action::OctaveUp),
        KeyCode::Down => Some(Action::OctaveDown),
        KeyCode::Esc => Some(Action::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyboardLayout;
    use crate::theory::Letter;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn azerty() -> KeyMap {
        KeyMap::new(KeyboardLayout::Azerty, 4)
    }

    #[test]
    fn ctrl_q_quits() {
        assert_eq!(map_key(ctrl_key('q'), &azerty(), false), Some(Action::Quit));
        assert_eq!(map_key(ctrl_key('q'), &azerty(), true), Some(Action::Quit));
    }

    #[test]
    fn space_toggles_playback() {
        assert_eq!(
            map_key(key(KeyCode::Char(' ')), &azerty(), false),
            Some(Action::TogglePlayback)
        );
    }

    #[test]
    fn piano_keys_enter_notes() {
        assert_eq!(
            map_key(key(KeyCode::Char('z')), &azerty(), false),
            Some(Action::Note(Pitch::sharp(Letter::C, 4)))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('b')), &azerty(), false),
            Some(Action::Note(Pitch::Rest))
        );
        assert_eq!(map_key(key(KeyCode::Char('x')), &azerty(), false), None);
    }

    #[test]
    fn qwerty_map_is_respected() {
        let qwerty = KeyMap::new(KeyboardLayout::Qwerty, 3);
        assert_eq!(
            map_key(key(KeyCode::Char('a')), &qwerty, false),
            Some(Action::Note(Pitch::natural(Letter::C, 3)))
        );
    }

    #[test]
    fn digits_and_function_keys_select_durations() {
        assert_eq!(
            map_key(key(KeyCode::Char('3')), &azerty(), false),
            Some(Action::SelectDuration(DurationCode::Quarter))
        );
        assert_eq!(
            map_key(key(KeyCode::F(6)), &azerty(), false),
            Some(Action::SelectDuration(DurationCode::ThirtySecond))
        );
        assert_eq!(map_key(key(KeyCode::Char('7')), &azerty(), false), None);
        assert_eq!(
            map_key(key(KeyCode::Char('.')), &azerty(), false),
            Some(Action::ToggleDot)
        );
    }

    #[test]
    fn editing_keys() {
        let m = azerty();
        assert_eq!(
            map_key(key(KeyCode::Backspace), &m, false),
            Some(Action::RemoveLast)
        );
        assert_eq!(
            map_key(key(KeyCode::Delete), &m, false),
            Some(Action::ClearAll)
        );
        assert_eq!(
            map_key(key(KeyCode::Enter), &m, false),
            Some(Action::ApplyDurationToLast)
        );
        assert_eq!(map_key(key(KeyCode::Up), &m, false), Some(Action::OctaveUp));
        assert_eq!(
            map_key(key(KeyCode::Char('-')), &m, false),
            Some(Action::VolumeDown)
        );
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let m = azerty();
        assert_eq!(map_key(key(KeyCode::Char('q')), &m, true), None);
        assert_eq!(map_key(key(KeyCode::Char(' ')), &m, true), None);
        assert_eq!(map_key(key(KeyCode::Esc), &m, true), Some(Action::Escape));
        assert_eq!(
            map_key(key(KeyCode::Down), &m, true),
            Some(Action::HelpScrollDown)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('?')), &m, true),
            Some(Action::Escape)
        );
    }
}
