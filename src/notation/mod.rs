//! Notation: the melody under construction, its layout, and where it is drawn.

pub mod layout;
pub mod melody;
pub mod note;
pub mod stave;
pub mod surface;

pub use layout::{Layout, LayoutMetrics};
pub use melody::Melody;
pub use note::{parse_notes, Note};
pub use stave::Stave;
pub use surface::{NullSurface, RenderSurface, TextStave};

use thiserror::Error;

use crate::theory::{InvalidDurationCode, InvalidPitch};

/// Errors raised while building notes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid note: {0}")]
    InvalidNote(String),
    #[error(transparent)]
    InvalidDuration(#[from] InvalidDurationCode),
    #[error(transparent)]
    InvalidPitch(#[from] InvalidPitch),
}
