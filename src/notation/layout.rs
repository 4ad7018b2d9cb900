//! Stave layout: per-note widths and the total stave width.
//!
//! Layout is recomputed from scratch after every melody change. Melodies are
//! short, so there is no incremental patching.

use serde::{Deserialize, Serialize};

use super::Note;

/// Glyph widths in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// The stave never gets narrower than this.
    pub min_width: f64,
    /// Space added after every note.
    pub note_margin: f64,
    pub head_width: f64,
    pub rest_width: f64,
    /// Extra width for eighth notes and shorter.
    pub flag_width: f64,
    /// Extra width when any pitch of the chord is sharp.
    pub accidental_width: f64,
    pub dot_width: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            min_width: 450.0,
            note_margin: 5.0,
            head_width: 16.0,
            rest_width: 14.0,
            flag_width: 8.0,
            accidental_width: 10.0,
            dot_width: 6.0,
        }
    }
}

impl LayoutMetrics {
    /// Every width raised to at least zero (NaN becomes zero), so adding a
    /// note can never shrink the stave.
    pub fn clamped(self) -> Self {
        let w = |v: f64| v.max(0.0);
        Self {
            min_width: w(self.min_width),
            note_margin: w(self.note_margin),
            head_width: w(self.head_width),
            rest_width: w(self.rest_width),
            flag_width: w(self.flag_width),
            accidental_width: w(self.accidental_width),
            dot_width: w(self.dot_width),
        }
    }

    /// Rendered width of one note, margin excluded.
    pub fn note_width(&self, note: &Note) -> f64 {
        let duration = note.duration();
        let mut width = if note.is_rest() {
            self.rest_width
        } else {
            let mut w = self.head_width;
            if duration.code().is_flagged() {
                w += self.flag_width;
            }
            if note.has_sharp() {
                w += self.accidental_width;
            }
            w
        };
        if duration.is_dotted() {
            width += self.dot_width;
        }
        width
    }
}

/// Widths derived from a melody.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    note_widths: Vec<f64>,
    total_width: f64,
}

impl Layout {
    /// Layout of an empty stave.
    pub fn empty(metrics: &LayoutMetrics) -> Self {
        Self {
            note_widths: Vec::new(),
            total_width: metrics.min_width,
        }
    }

    /// `total = max(min_width, Σ (note width + margin))`.
    pub fn compute(notes: &[Note], metrics: &LayoutMetrics) -> Self {
        let note_widths: Vec<f64> = notes.iter().map(|n| metrics.note_width(n)).collect();
        let content: f64 = note_widths.iter().map(|w| w + metrics.note_margin).sum();
        Self {
            note_widths,
            total_width: content.max(metrics.min_width),
        }
    }

    pub fn note_widths(&self) -> &[f64] {
        &self.note_widths
    }

    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    /// Left edge of each note, notes packed from zero with their margins.
    pub fn note_offsets(&self, metrics: &LayoutMetrics) -> Vec<f64> {
        let mut x = 0.0;
        self.note_widths
            .iter()
            .map(|w| {
                let left = x;
                x += w + metrics.note_margin;
                left
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    #[test]
    fn empty_layout_is_min_width() {
        let m = LayoutMetrics::default();
        assert_approx_eq!(Layout::empty(&m).total_width(), 450.0);
        assert_eq!(Layout::compute(&[], &m), Layout::empty(&m));
    }

    #[test]
    fn glyph_widths() {
        let m = LayoutMetrics::default();
        assert_approx_eq!(m.note_width(&note("C4:q")), 16.0);
        assert_approx_eq!(m.note_width(&note("C4:8")), 24.0);
        assert_approx_eq!(m.note_width(&note("C#4:q")), 26.0);
        assert_approx_eq!(m.note_width(&note("C#4+E4:16d")), 40.0);
        assert_approx_eq!(m.note_width(&note("r:qd")), 20.0);
        // rests carry no flag even when short
        assert_approx_eq!(m.note_width(&note("r:32")), 14.0);
    }

    #[test]
    fn total_grows_past_minimum() {
        let m = LayoutMetrics::default();
        let notes: Vec<Note> = (0..30).map(|_| note("C4:q")).collect();
        let layout = Layout::compute(&notes, &m);
        assert_approx_eq!(layout.total_width(), 30.0 * 21.0);
        assert_eq!(layout.note_widths().len(), 30);
    }

    #[test]
    fn offsets_accumulate_widths_and_margins() {
        let m = LayoutMetrics::default();
        let notes = [note("C4:q"), note("C#4:q"), note("r:h")];
        let layout = Layout::compute(&notes, &m);
        let offsets = layout.note_offsets(&m);
        assert_eq!(offsets.len(), 3);
        assert_approx_eq!(offsets[0], 0.0);
        assert_approx_eq!(offsets[1], 21.0);
        assert_approx_eq!(offsets[2], 52.0);
    }

    #[test]
    fn clamped_metrics_have_no_negative_widths() {
        let m = LayoutMetrics {
            note_margin: -30.0,
            head_width: -1.0,
            dot_width: f64::NAN,
            ..LayoutMetrics::default()
        }
        .clamped();
        assert_approx_eq!(m.note_margin, 0.0);
        assert_approx_eq!(m.head_width, 0.0);
        assert_approx_eq!(m.dot_width, 0.0);
        assert_approx_eq!(m.rest_width, 14.0);
    }

    #[test]
    fn metrics_from_partial_yaml() {
        let m: LayoutMetrics = serde_yaml::from_str("min_width: 300\n").unwrap();
        assert_approx_eq!(m.min_width, 300.0);
        assert_approx_eq!(m.note_margin, 5.0);
    }
}
