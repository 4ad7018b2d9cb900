//! skrid: melody capture for melodic search.
//!
//! A virtual piano feeds a stave; the stave's melody can be played back with
//! overlapping ring-out and exported as a query parameter.

pub mod audio;
pub mod config;
pub mod keymap;
pub mod log;
pub mod notation;
pub mod playback;
pub mod query;
pub mod samples;
pub mod theory;
pub mod tui;
