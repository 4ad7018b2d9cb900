//! The melody player: an `Idle`/`Playing` state machine over a melody.
//!
//! Playing walks the notes one boundary at a time: at each boundary it checks
//! for a pending stop, starts every pitch of the next note with a ring-out
//! watcher, and schedules the following boundary one nominal duration later.
//! Watchers fade their own instances at 2× the nominal duration, independent
//! of where the scheduler is. The player advances only when [`Player::tick`]
//! runs; boundaries are computed from the previous boundary, so a late tick
//! catches up without drift.

use std::collections::HashMap;
use std::time::Duration;

use crate::log::EventLog;
use crate::notation::{Melody, Note};
use crate::theory::{sample_key, Pitch};

use super::clock::Clock;
use super::config::PlaybackConfig;
use super::output::AudioOutput;
use super::registry::{InstanceId, Registry};
use super::watcher::{FadeWatcher, WatchStatus};
use super::PlaybackError;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

/// One run over a melody snapshot.
#[derive(Debug)]
struct PlaybackSession {
    notes: Vec<Note>,
    cursor: usize,
    next_boundary: Duration,
    stop_requested: bool,
}

/// Plays melodies and live keys through an audio output.
pub struct Player<A: AudioOutput, C: Clock> {
    output: A,
    clock: C,
    config: PlaybackConfig,
    session: Option<PlaybackSession>,
    registry: Registry<A::Instance>,
    /// Held keys by pitch. Kept apart from the registry's pitch index, which
    /// melody playback and previews repoint.
    held: HashMap<Pitch, InstanceId>,
    watchers: Vec<FadeWatcher>,
    log: EventLog,
}

impl<A: AudioOutput, C: Clock> Player<A, C> {
    /// A config that fails [`PlaybackConfig::validate`] is replaced by the
    /// defaults, with a warning in the log.
    pub fn new(output: A, clock: C, config: PlaybackConfig) -> Self {
        let mut log = EventLog::default();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log.warn(format!("{e}; using default playback settings"));
                PlaybackConfig::default()
            }
        };
        Self {
            output,
            clock,
            config,
            session: None,
            registry: Registry::new(),
            held: HashMap::new(),
            watchers: Vec::new(),
            log,
        }
    }

    pub fn state(&self) -> PlayState {
        if self.session.is_some() {
            PlayState::Playing
        } else {
            PlayState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlayState::Playing
    }

    /// The play/stop control.
    ///
    /// Idle: start playing `melody` from its first note (nothing happens for an
    /// empty melody). Playing: ask the current session to stop at the next
    /// note boundary; repeated presses keep asking, they never start a second
    /// session.
    pub fn toggle(&mut self, melody: &Melody) -> PlayState {
        if self.session.is_some() {
            self.request_stop();
            return PlayState::Playing;
        }
        if melody.is_empty() {
            return PlayState::Idle;
        }

        self.session = Some(PlaybackSession {
            notes: melody.notes().to_vec(),
            cursor: 0,
            next_boundary: self.clock.now(),
            stop_requested: false,
        });
        self.log
            .info(format!("playing {} notes", melody.len()));
        self.tick();
        self.state()
    }

    /// Stop at the next note boundary. Ringing notes are not cut short.
    pub fn request_stop(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.stop_requested {
                session.stop_requested = true;
                self.log.info("stop requested");
            }
        }
    }

    /// Process every note boundary and watcher due at the current time.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_session(now);
        self.poll_watchers(now);
    }

    /// Tick and sleep `poll` at a time until the melody is over and nothing
    /// sounds. `interrupt` is checked every round; returning `true` requests a
    /// stop, and once the session has stopped everything still sounding,
    /// held keys included, is faded out. Without an interrupt, held keys must
    /// be released for this to return.
    pub fn run_until_silent(&mut self, poll: Duration, mut interrupt: impl FnMut() -> bool) {
        let mut interrupted = false;
        let mut silenced = false;
        loop {
            if !interrupted && interrupt() {
                interrupted = true;
                self.request_stop();
            }
            self.tick();
            if interrupted && !silenced && self.session.is_none() {
                self.silence();
                silenced = true;
            }
            if self.session.is_none() && self.registry.is_empty() {
                break;
            }
            self.clock.sleep(poll);
        }
    }

    /// Fade out every sounding instance now, whatever its cutoff. The fade
    /// runs on the player's clock, so it ends even if the output has stalled.
    pub fn silence(&mut self) {
        let now = self.clock.now();
        for watcher in &mut self.watchers {
            watcher.begin_fade(now);
        }
        self.held.clear();
    }

    /// Sound one note with the usual ring-out, outside any session.
    pub fn preview(&mut self, note: &Note) {
        self.dispatch(note);
    }

    /// Start a held key. A key already held for the same pitch is faded out.
    pub fn press(&mut self, pitch: Pitch) {
        let Some(key) = sample_key(&pitch) else {
            return;
        };
        if let Some(previous) = self.held.remove(&pitch) {
            self.fade_out(previous);
        }
        let volume = self.config.volume;
        match self.output.play(&key, volume) {
            Ok(instance) => {
                let id = self.registry.insert(pitch, instance);
                self.held.insert(pitch, id);
                self.watchers.push(FadeWatcher::held(id, volume));
            }
            Err(e) => self.log.warn(format!("skipping {pitch}: {e}")),
        }
    }

    /// Fade out the key held for `pitch`, or failing that whatever the
    /// registry holds for it.
    pub fn release(&mut self, pitch: Pitch) {
        let id = self
            .held
            .remove(&pitch)
            .or_else(|| self.registry.id_for(&pitch));
        if let Some(id) = id {
            self.fade_out(id);
        }
    }

    /// Volume for instances started from now on.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        self.config.volume = volume;
        Ok(())
    }

    pub fn volume(&self) -> f32 {
        self.config.volume
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Live instances, orphaned repeats included.
    pub fn sounding(&self) -> usize {
        self.registry.len()
    }

    /// Index of the next note the session will start.
    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.cursor)
    }

    /// When the session reaches its next note boundary.
    pub fn next_boundary(&self) -> Option<Duration> {
        self.session.as_ref().map(|s| s.next_boundary)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    fn advance_session(&mut self, now: Duration) {
        let whole = self.config.whole_note_seconds;
        while let Some(session) = self.session.as_mut() {
            if now < session.next_boundary {
                break;
            }
            if session.stop_requested {
                let at = session.cursor;
                self.session = None;
                self.log.info(format!("stopped before note {}", at + 1));
                break;
            }
            let Some(note) = session.notes.get(session.cursor).cloned() else {
                self.session = None;
                self.log.info("melody finished");
                break;
            };
            session.cursor += 1;
            session.next_boundary = session
                .next_boundary
                .saturating_add(note.duration().seconds(whole));
            self.dispatch(&note);
        }
    }

    fn dispatch(&mut self, note: &Note) {
        let nominal = note
            .duration()
            .seconds(self.config.whole_note_seconds)
            .as_secs_f64();
        let cutoff = nominal * self.config.ring_out_factor;
        let volume = self.config.volume;

        for pitch in note.pitches() {
            let Some(key) = sample_key(pitch) else {
                continue;
            };
            match self.output.play(&key, volume) {
                Ok(instance) => {
                    let id = self.registry.insert(*pitch, instance);
                    self.watchers
                        .push(FadeWatcher::ring_out(id, cutoff, volume));
                }
                Err(e) => self.log.warn(format!("skipping {pitch}: {e}")),
            }
        }
    }

    fn fade_out(&mut self, id: InstanceId) {
        let now = self.clock.now();
        if let Some(watcher) = self.watchers.iter_mut().find(|w| w.id() == id) {
            watcher.begin_fade(now);
        }
    }

    fn poll_watchers(&mut self, now: Duration) {
        let fade = self.config.fade_out();
        let registry = &mut self.registry;
        self.watchers
            .retain_mut(|w| w.poll(registry, now, fade) == WatchStatus::Active);
    }
}
