//! The melody being entered: an ordered list of notes.
//!
//! Only the owning [`Stave`](super::Stave) can change it; everyone else reads.

use std::time::Duration as StdDuration;

use super::Note;

/// Insertion-ordered sequence of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Melody {
    notes: Vec<Note>,
}

impl Melody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn last(&self) -> Option<&Note> {
        self.notes.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    /// Total length in whole notes.
    pub fn total_fraction(&self) -> f64 {
        self.notes.iter().map(|n| n.duration().fraction()).sum()
    }

    /// How long one pass of playback keeps the scheduler busy.
    pub fn playing_time(&self, whole_note_seconds: f64) -> StdDuration {
        self.notes
            .iter()
            .map(|n| n.duration().seconds(whole_note_seconds))
            .sum()
    }

    pub(super) fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub(super) fn pop(&mut self) -> Option<Note> {
        self.notes.pop()
    }

    pub(super) fn clear(&mut self) {
        self.notes.clear();
    }
}

impl<'a> IntoIterator for &'a Melody {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
