//! Fade-out watchers: one per sounding instance.
//!
//! A watcher waits until its instance has sounded for the ring-out cutoff (or
//! until the key is released), ramps the volume linearly to zero over the
//! fade window, then pauses the instance and drops it from the registry.

use std::time::Duration;

use super::output::AudioInstance;
use super::registry::{InstanceId, Registry};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Held key: sounds until released.
    Held { volume: f32 },
    /// Rings until the instance has sounded `cutoff` seconds.
    Ringing { cutoff: f64, volume: f32 },
    Fading { since: Duration, from: f32 },
}

/// Whether a watcher still has work to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    Active,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadeWatcher {
    id: InstanceId,
    phase: Phase,
}

impl FadeWatcher {
    /// Fade once the instance has sounded `cutoff_seconds`.
    pub fn ring_out(id: InstanceId, cutoff_seconds: f64, volume: f32) -> Self {
        Self {
            id,
            phase: Phase::Ringing {
                cutoff: cutoff_seconds,
                volume,
            },
        }
    }

    /// Sound until [`begin_fade`](Self::begin_fade) is called.
    pub fn held(id: InstanceId, volume: f32) -> Self {
        Self {
            id,
            phase: Phase::Held { volume },
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.phase, Phase::Fading { .. })
    }

    /// Start the fade at `now`; a fade already running is left alone.
    pub fn begin_fade(&mut self, now: Duration) {
        match self.phase {
            Phase::Held { volume } | Phase::Ringing { volume, .. } => {
                self.phase = Phase::Fading {
                    since: now,
                    from: volume,
                };
            }
            Phase::Fading { .. } => {}
        }
    }

    /// Advance the watcher to `now`.
    pub fn poll<I: AudioInstance>(
        &mut self,
        registry: &mut Registry<I>,
        now: Duration,
        fade: Duration,
    ) -> WatchStatus {
        let Some(instance) = registry.get_mut(self.id) else {
            return WatchStatus::Done;
        };
        if instance.has_stopped() {
            registry.release(self.id);
            return WatchStatus::Done;
        }

        if let Phase::Ringing { cutoff, .. } = self.phase {
            if instance.elapsed_seconds() < cutoff {
                return WatchStatus::Active;
            }
            self.begin_fade(now);
        }

        match self.phase {
            Phase::Held { .. } | Phase::Ringing { .. } => WatchStatus::Active,
            Phase::Fading { since, from } => {
                let progress = if fade.is_zero() {
                    1.0
                } else {
                    now.saturating_sub(since).as_secs_f64() / fade.as_secs_f64()
                };
                if progress < 1.0 {
                    instance.set_volume(from * (1.0 - progress) as f32);
                    return WatchStatus::Active;
                }
                if let Some(mut instance) = registry.release(self.id) {
                    instance.set_volume(0.0);
                    instance.pause();
                }
                WatchStatus::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{Letter, Pitch};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Instance whose elapsed time is driven by the test.
    struct Probe {
        elapsed: Rc<Cell<f64>>,
        stopped: Rc<Cell<bool>>,
        volume: Rc<Cell<f32>>,
        paused: Rc<Cell<bool>>,
    }

    impl AudioInstance for Probe {
        fn set_volume(&mut self, volume: f32) {
            self.volume.set(volume);
        }

        fn pause(&mut self) {
            self.paused.set(true);
        }

        fn elapsed_seconds(&self) -> f64 {
            self.elapsed.get()
        }

        fn has_stopped(&self) -> bool {
            self.stopped.get()
        }
    }

    struct Fixture {
        registry: Registry<Probe>,
        id: InstanceId,
        elapsed: Rc<Cell<f64>>,
        stopped: Rc<Cell<bool>>,
        volume: Rc<Cell<f32>>,
        paused: Rc<Cell<bool>>,
    }

    fn fixture() -> Fixture {
        let elapsed = Rc::new(Cell::new(0.0));
        let volume = Rc::new(Cell::new(0.5));
        let paused = Rc::new(Cell::new(false));
        let stopped = Rc::new(Cell::new(false));
        let mut registry = Registry::new();
        let id = registry.insert(
            Pitch::natural(Letter::C, 4),
            Probe {
                elapsed: elapsed.clone(),
                stopped: stopped.clone(),
                volume: volume.clone(),
                paused: paused.clone(),
            },
        );
        Fixture {
            registry,
            id,
            elapsed,
            stopped,
            volume,
            paused,
        }
    }

    const FADE: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ringing_waits_for_cutoff_then_fades() {
        let mut f = fixture();
        let mut w = FadeWatcher::ring_out(f.id, 0.5, 0.5);

        f.elapsed.set(0.49);
        assert_eq!(w.poll(&mut f.registry, ms(490), FADE), WatchStatus::Active);
        assert!(!w.is_fading());

        f.elapsed.set(0.5);
        assert_eq!(w.poll(&mut f.registry, ms(500), FADE), WatchStatus::Active);
        assert!(w.is_fading());

        assert_eq!(w.poll(&mut f.registry, ms(550), FADE), WatchStatus::Active);
        assert!((f.volume.get() - 0.25).abs() < 1e-6);
        assert!(!f.paused.get());

        assert_eq!(w.poll(&mut f.registry, ms(600), FADE), WatchStatus::Done);
        assert_eq!(f.volume.get(), 0.0);
        assert!(f.paused.get());
        assert!(f.registry.is_empty());
    }

    #[test]
    fn held_until_fade_begins() {
        let mut f = fixture();
        let mut w = FadeWatcher::held(f.id, 0.5);
        f.elapsed.set(100.0);
        assert_eq!(w.poll(&mut f.registry, ms(10), FADE), WatchStatus::Active);
        w.begin_fade(ms(20));
        assert_eq!(w.poll(&mut f.registry, ms(120), FADE), WatchStatus::Done);
        assert!(f.paused.get());
    }

    #[test]
    fn begin_fade_is_not_restarted() {
        let mut f = fixture();
        let mut w = FadeWatcher::held(f.id, 0.5);
        w.begin_fade(ms(0));
        w.begin_fade(ms(90));
        assert_eq!(w.poll(&mut f.registry, ms(100), FADE), WatchStatus::Done);
    }

    #[test]
    fn zero_fade_releases_immediately() {
        let mut f = fixture();
        let mut w = FadeWatcher::ring_out(f.id, 0.0, 0.5);
        assert_eq!(
            w.poll(&mut f.registry, ms(0), Duration::ZERO),
            WatchStatus::Done
        );
    }

    #[test]
    fn instance_stopped_by_the_output_is_released() {
        let mut f = fixture();
        let mut w = FadeWatcher::ring_out(f.id, 0.5, 0.5);
        assert_eq!(w.poll(&mut f.registry, ms(10), FADE), WatchStatus::Active);

        // elapsed time never advances, yet the watcher still finishes
        f.stopped.set(true);
        assert_eq!(w.poll(&mut f.registry, ms(20), FADE), WatchStatus::Done);
        assert!(f.registry.is_empty());
    }

    #[test]
    fn missing_instance_finishes_the_watcher() {
        let mut f = fixture();
        f.registry.release(f.id);
        let mut w = FadeWatcher::ring_out(f.id, 1.0, 0.5);
        assert_eq!(w.poll(&mut f.registry, ms(0), FADE), WatchStatus::Done);
    }
}
