//! Status bar: playback state, entry settings and melody size.

use crate::keymap::KeyboardLayout;
use crate::theory::Duration;

/// Snapshot of what the status bar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusInfo {
    pub is_playing: bool,
    /// Duration given to newly entered notes.
    pub duration: Duration,
    pub base_octave: i8,
    pub volume: f32,
    pub layout: KeyboardLayout,
    pub note_count: usize,
    pub stave_width: f64,
    pub audio_label: String,
}

impl StatusInfo {
    pub fn playback_display(&self) -> &str {
        if self.is_playing {
            "PLAY"
        } else {
            "STOP"
        }
    }

    /// Selected duration as a musical name, e.g. "dotted quarter".
    pub fn duration_display(&self) -> String {
        let name = match self.duration.code().denominator() {
            1 => "whole",
            2 => "half",
            4 => "quarter",
            8 => "eighth",
            16 => "16th",
            _ => "32nd",
        };
        if self.duration.is_dotted() {
            format!("dotted {name}")
        } else {
            name.to_string()
        }
    }

    pub fn layout_display(&self) -> &str {
        match self.layout {
            KeyboardLayout::Azerty => "AZERTY",
            KeyboardLayout::Qwerty => "QWERTY",
        }
    }

    pub fn volume_display(&self) -> String {
        format!("{:.0}%", self.volume * 100.0)
    }
}
