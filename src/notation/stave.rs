//! The editing stave: owns the melody, keeps its layout current, redraws.
//!
//! Every mutation recomputes the layout from scratch and redraws the surface
//! before returning, so a reader never sees a stale width.

use crate::theory::{Duration, DurationCode, Pitch};

use super::layout::{Layout, LayoutMetrics};
use super::surface::RenderSurface;
use super::{Melody, NotationError, Note};

/// Notation component for one editing session.
pub struct Stave<S: RenderSurface> {
    melody: Melody,
    layout: Layout,
    metrics: LayoutMetrics,
    surface: S,
}

impl<S: RenderSurface> Stave<S> {
    /// An empty stave, drawn once at its minimum width. Negative metrics are
    /// clamped to zero.
    pub fn new(surface: S, metrics: LayoutMetrics) -> Self {
        let metrics = metrics.clamped();
        let mut stave = Self {
            melody: Melody::new(),
            layout: Layout::empty(&metrics),
            metrics,
            surface,
        };
        stave.refresh();
        stave
    }

    /// Append a note built from `pitches` and a duration.
    ///
    /// Fails without touching the melody when the pitch set is empty, mixes a
    /// rest into a chord, or the duration does not exist.
    pub fn append_note(
        &mut self,
        pitches: Vec<Pitch>,
        code: DurationCode,
        dotted: bool,
    ) -> Result<(), NotationError> {
        let duration = Duration::new(code, dotted)?;
        let note = Note::new(pitches, duration)?;
        self.push_note(note);
        Ok(())
    }

    /// Append an already validated note.
    pub fn push_note(&mut self, note: Note) {
        self.melody.push(note);
        self.refresh();
    }

    /// Pop the last note. Nothing happens on an empty melody.
    pub fn remove_last(&mut self) -> Option<Note> {
        let removed = self.melody.pop()?;
        self.refresh();
        Some(removed)
    }

    /// Empty the melody; the width drops back to the minimum.
    pub fn clear_all(&mut self) {
        self.melody.clear();
        self.refresh();
    }

    /// Give the last note a new duration, keeping its pitches (and rest-ness).
    pub fn change_last_note_duration(
        &mut self,
        code: DurationCode,
        dotted: bool,
    ) -> Result<(), NotationError> {
        let duration = Duration::new(code, dotted)?;
        if let Some(last) = self.remove_last() {
            self.push_note(last.with_duration(duration));
        }
        Ok(())
    }

    pub fn melody(&self) -> &Melody {
        &self.melody
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn width(&self) -> f64 {
        self.layout.total_width()
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn refresh(&mut self) {
        self.layout = Layout::compute(self.melody.notes(), &self.metrics);
        self.surface.clear();
        self.surface.draw(self.melody.notes(), self.layout.total_width());
    }
}
