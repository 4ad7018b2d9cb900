//! Help screen: modal overlay with the key reference.

use crate::keymap::KeyboardLayout;

/// A line in the help screen.
#[derive(Debug, Clone)]
pub struct HelpLine {
    pub text: String,
    pub is_header: bool,
}

#[derive(Debug, Clone)]
pub struct HelpScreen {
    pub visible: bool,
    pub scroll_offset: usize,
    content: Vec<HelpLine>,
}

impl HelpScreen {
    /// Help for the given keyboard layout.
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            visible: false,
            scroll_offset: 0,
            content: Self::build_content(layout),
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, max_visible: usize) {
        let max_scroll = self.content.len().saturating_sub(max_visible);
        if self.scroll_offset < max_scroll {
            self.scroll_offset += 1;
        }
    }

    pub fn lines(&self) -> &[HelpLine] {
        &self.content
    }

    fn build_content(layout: KeyboardLayout) -> Vec<HelpLine> {
        let h = |text: &str| HelpLine {
            text: text.to_string(),
            is_header: true,
        };
        let l = |text: &str| HelpLine {
            text: text.to_string(),
            is_header: false,
        };

        let (lower, upper) = match layout {
            KeyboardLayout::Azerty => (
                "  q z s e d f t g y h u j   C C# D D# E F F# G G# A A# B",
                "  k o l p m ù ) * $         C C# D D# E F F# G G# (octave up)",
            ),
            KeyboardLayout::Qwerty => (
                "  a w s e d f t g y h u j   C C# D D# E F F# G G# A A# B",
                "  k o l p ; ' \\ ]           C C# D D# E F G G# (octave up)",
            ),
        };

        vec![
            h("PIANO"),
            l(lower),
            l(upper),
            l("  b            Rest"),
            l("  Up/Down      Move the keyboard an octave"),
            l(""),
            h("DURATION"),
            l("  1-6 / F1-F6  Whole, half, quarter, 8th, 16th, 32nd"),
            l("  .            Toggle dot"),
            l("  Enter        Apply duration to the last note"),
            l(""),
            h("MELODY"),
            l("  Backspace    Remove last note"),
            l("  Delete       Clear all notes"),
            l("  Space        Play / stop at next note"),
            l("  +/-          Volume"),
            l(""),
            h("GLOBAL"),
            l("  ?            Toggle this help"),
            l("  Esc          Close help"),
            l("  Ctrl-Q       Quit"),
        ]
    }
}

impl Default for HelpScreen {
    fn default() -> Self {
        Self::new(KeyboardLayout::default())
    }
}
