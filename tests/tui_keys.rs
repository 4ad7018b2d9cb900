//! TUI end-to-end tests: key events through the bindings into the app, with
//! playback on virtual time.

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use common::{ms, player, RecordingOutput};
use skrid::keymap::{KeyMap, KeyboardLayout};
use skrid::notation::LayoutMetrics;
use skrid::playback::{Clock, ManualClock};
use skrid::tui::{keybindings, App};

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

struct Harness {
    app: App<RecordingOutput, ManualClock>,
    clock: ManualClock,
    recording: common::Recording,
}

impl Harness {
    fn new(layout: KeyboardLayout) -> Self {
        let (player, clock, recording) = player();
        let app = App::new(
            player,
            KeyMap::new(layout, 4),
            LayoutMetrics::default(),
            "test",
        );
        Self {
            app,
            clock,
            recording,
        }
    }

    fn press(&mut self, event: KeyEvent) {
        let action = keybindings::map_key(event, &self.app.keymap, self.app.help_screen.visible);
        if let Some(action) = action {
            self.app.handle_action(action);
        }
    }

    fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.press(key(KeyCode::Char(c)));
        }
    }

    fn melody_text(&self) -> Vec<String> {
        self.app
            .stave
            .melody()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    fn run_to(&mut self, until: std::time::Duration) {
        while self.clock.now() < until {
            self.clock.advance(ms(5));
            self.app.player.tick();
        }
    }
}

#[test]
fn azerty_keys_enter_notes_with_the_selected_duration() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.type_keys("qz");
    h.press(key(KeyCode::Char('2')));
    h.press(key(KeyCode::Char('.')));
    h.type_keys("kb");
    assert_eq!(h.melody_text(), vec!["C4:q", "C#4:q", "C5:hd", "r:hd"]);
}

#[test]
fn qwerty_positions_match_azerty() {
    let mut h = Harness::new(KeyboardLayout::Qwerty);
    h.type_keys("aw;");
    assert_eq!(h.melody_text(), vec!["C4:q", "C#4:q", "E5:q"]);
}

#[test]
fn editing_keys_change_the_melody() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.type_keys("qsd");
    h.press(key(KeyCode::Backspace));
    assert_eq!(h.melody_text(), vec!["C4:q", "D4:q"]);

    h.press(key(KeyCode::F(4)));
    h.press(key(KeyCode::Enter));
    assert_eq!(h.melody_text(), vec!["C4:q", "D4:8"]);

    h.press(key(KeyCode::Delete));
    assert!(h.app.stave.melody().is_empty());
}

#[test]
fn octave_arrows_shift_new_notes() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.press(key(KeyCode::Up));
    h.type_keys("q");
    h.press(key(KeyCode::Down));
    h.press(key(KeyCode::Down));
    h.type_keys("q");
    assert_eq!(h.melody_text(), vec!["C5:q", "C3:q"]);
}

#[test]
fn entered_notes_are_heard_once() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.type_keys("qb");
    assert_eq!(h.recording.keys(), vec!["C4"]);
    h.run_to(ms(700));
    assert!(h.recording.find("C4").paused_at.is_some());
}

#[test]
fn space_plays_and_stops_at_the_next_boundary() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.type_keys("qsd");
    let previews = h.recording.all().len();
    h.run_to(ms(1000));

    h.press(key(KeyCode::Char(' ')));
    assert!(h.app.player.is_playing());
    h.run_to(ms(1100));
    h.press(key(KeyCode::Char(' ')));
    h.run_to(ms(1250));
    assert!(!h.app.player.is_playing());

    let played: Vec<String> = h.recording.keys()[previews..].to_vec();
    assert_eq!(played, vec!["C4"]);
}

#[test]
fn help_overlay_captures_keys() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.press(key(KeyCode::Char('?')));
    assert!(h.app.help_screen.visible);

    h.type_keys("qsd");
    assert!(h.app.stave.melody().is_empty());

    h.press(key(KeyCode::Esc));
    assert!(!h.app.help_screen.visible);
    h.type_keys("q");
    assert_eq!(h.app.stave.melody().len(), 1);
}

#[test]
fn ctrl_q_quits_even_with_help_open() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.press(key(KeyCode::Char('?')));
    h.press(ctrl_key('q'));
    assert!(h.app.should_quit);
}

#[test]
fn render_shows_entered_notes() {
    let mut h = Harness::new(KeyboardLayout::Azerty);
    h.type_keys("qsdfg");
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|f| h.app.draw(f)).unwrap();
    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("5 notes"));
    assert!(text.contains("AZERTY"));
    assert!(text.contains("test"));
}
