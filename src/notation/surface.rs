//! Rendering surfaces: where the stave gets drawn after every change.
//!
//! [`TextStave`] draws a five-line treble stave as text rows for the terminal.

use super::layout::{Layout, LayoutMetrics};
use super::Note;
use crate::theory::DurationCode;

/// Something that can show the melody as notation.
pub trait RenderSurface {
    /// Wipe everything drawn so far.
    fn clear(&mut self);

    /// Draw the stave at `stave_width` layout pixels with `notes` on it.
    fn draw(&mut self, notes: &[Note], stave_width: f64);
}

/// A surface that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn clear(&mut self) {}

    fn draw(&mut self, _notes: &[Note], _stave_width: f64) {}
}

/// Highest staff step shown (C6).
const TOP_STEP: i32 = 6 * 7;
/// Lowest staff step shown (A3).
const BOTTOM_STEP: i32 = 3 * 7 + 5;
/// Treble stave lines, E4 to F5.
const LINE_STEPS: [i32; 5] = [30, 32, 34, 36, 38];
/// Rests sit on the middle line (B4).
const REST_STEP: i32 = 34;
/// Columns reserved for the clef and barline at the left edge.
const CLEF_COLUMNS: usize = 3;

/// Text-mode treble stave.
#[derive(Debug, Clone)]
pub struct TextStave {
    metrics: LayoutMetrics,
    px_per_column: f64,
    lines: Vec<String>,
    draw_count: usize,
}

impl TextStave {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            px_per_column: 6.0,
            lines: Vec::new(),
            draw_count: 0,
        }
    }

    /// Change the horizontal scale (layout pixels per character column).
    pub fn with_px_per_column(mut self, px: f64) -> Self {
        self.px_per_column = px.max(1.0);
        self
    }

    /// The rows drawn by the last `draw`, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// How many times the stave has been drawn.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    fn columns(&self, px: f64) -> usize {
        (px / self.px_per_column).round().max(0.0) as usize
    }

    fn row_of(step: i32) -> usize {
        (TOP_STEP - step.clamp(BOTTOM_STEP, TOP_STEP)) as usize
    }
}

impl Default for TextStave {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

fn head_glyph(code: DurationCode) -> char {
    match code {
        DurationCode::Whole => 'O',
        DurationCode::Half => 'd',
        DurationCode::Quarter => '♩',
        DurationCode::Eighth => '♪',
        DurationCode::Sixteenth | DurationCode::ThirtySecond => '♬',
    }
}

fn rest_glyph(code: DurationCode) -> char {
    match code {
        DurationCode::Whole | DurationCode::Half => '▬',
        _ => 'r',
    }
}

impl RenderSurface for TextStave {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw(&mut self, notes: &[Note], stave_width: f64) {
        let rows = (TOP_STEP - BOTTOM_STEP + 1) as usize;
        let width = CLEF_COLUMNS + self.columns(stave_width) + 2;
        let mut grid = vec![vec![' '; width]; rows];

        for step in LINE_STEPS {
            let row = Self::row_of(step);
            for cell in grid[row].iter_mut() {
                *cell = '─';
            }
            grid[row][0] = '│';
            grid[row][width - 1] = '│';
        }
        grid[Self::row_of(34)][1] = '𝄞';

        let layout = Layout::compute(notes, &self.metrics);
        let offsets = layout.note_offsets(&self.metrics);

        for (note, x) in notes.iter().zip(offsets) {
            let code = note.duration().code();
            let mut col = CLEF_COLUMNS + self.columns(x) + 1;
            if note.has_sharp() {
                col += 1;
            }
            if col >= width - 2 {
                break;
            }

            if note.is_rest() {
                let row = Self::row_of(REST_STEP);
                grid[row][col] = rest_glyph(code);
                if note.duration().is_dotted() {
                    grid[row][col + 1] = '.';
                }
                continue;
            }

            for step in note.pitches().iter().filter_map(|p| p.staff_step()) {
                // ledger lines between the stave and the head
                let ledgers = (step..LINE_STEPS[0])
                    .chain(LINE_STEPS[4] + 1..=step)
                    .filter(|s| s % 2 == 0);
                for ledger in ledgers {
                    let row = Self::row_of(ledger);
                    grid[row][col - 1] = '─';
                    grid[row][col + 1] = '─';
                }

                let row = Self::row_of(step);
                grid[row][col] = head_glyph(code);
                if note.has_sharp() {
                    let sharp = note
                        .pitches()
                        .iter()
                        .any(|p| p.is_sharp() && p.staff_step() == Some(step));
                    if sharp {
                        grid[row][col - 1] = '#';
                    }
                }
                if note.duration().is_dotted() {
                    grid[row][col + 1] = '.';
                }
            }
        }

        self.lines = grid.into_iter().map(|row| row.into_iter().collect()).collect();
        self.draw_count += 1;
    }
}
