//! Search query encoding.
//!
//! The matching backend takes the melody as a Python-literal list of tuples,
//! one per note: `(keys, denominator, dots)`, e.g.
//! `[(['c/4', 'e/4'], 4, 0), (['r'], 2, 1)]`.

use std::fmt::Write;

use crate::notation::Note;

/// Encode `notes` as the `notes` query parameter.
///
/// With `ignore_pitch` every key becomes `None` (the chord size is kept);
/// with `ignore_rhythm` each duration becomes `None, 0`. An empty melody
/// encodes as `[]`.
pub fn notes_query_param(notes: &[Note], ignore_pitch: bool, ignore_rhythm: bool) -> String {
    let mut out = String::from("[");
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str("([");
        for (j, pitch) in note.pitches().iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            if ignore_pitch {
                out.push_str("None");
            } else {
                let _ = write!(out, "'{}'", pitch.stave_key());
            }
        }
        out.push_str("], ");

        if ignore_rhythm {
            out.push_str("None, 0)");
        } else {
            let duration = note.duration();
            let dots = u8::from(duration.is_dotted());
            let _ = write!(out, "{}, {dots})", duration.code().denominator());
        }
    }
    out.push(']');
    out
}
