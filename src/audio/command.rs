//! Commands from the control thread to the audio thread.

use super::voice::Voice;

pub enum AudioCommand {
    /// Start mixing a new voice.
    Start(Voice),
    /// Master gain applied before the limiter, clamped to `[0, 1]`.
    SetMasterVolume(f32),
    /// Drop every voice immediately.
    Stop,
}
