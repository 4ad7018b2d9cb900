//! Registry of sounding instances.
//!
//! Instances live in an arena keyed by [`InstanceId`]; a second index maps a
//! pitch to the instance most recently started for it. Starting the same pitch
//! again repoints the index and leaves the older instance in the arena until
//! its own watcher releases it.

use std::collections::HashMap;

use crate::theory::Pitch;

/// Arena handle of one sounding instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

#[derive(Debug)]
pub struct Registry<I> {
    next_id: u64,
    instances: HashMap<InstanceId, I>,
    by_pitch: HashMap<Pitch, InstanceId>,
}

impl<I> Registry<I> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            instances: HashMap::new(),
            by_pitch: HashMap::new(),
        }
    }

    /// Store `instance` and point `pitch` at it (last writer wins).
    pub fn insert(&mut self, pitch: Pitch, instance: I) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(id, instance);
        self.by_pitch.insert(pitch, id);
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&I> {
        self.instances.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut I> {
        self.instances.get_mut(&id)
    }

    /// The instance currently registered for `pitch`.
    pub fn id_for(&self, pitch: &Pitch) -> Option<InstanceId> {
        self.by_pitch.get(pitch).copied()
    }

    /// Take an instance out of the arena. The pitch index is cleared only if
    /// it still points at this instance.
    pub fn release(&mut self, id: InstanceId) -> Option<I> {
        let instance = self.instances.remove(&id)?;
        self.by_pitch.retain(|_, current| *current != id);
        Some(instance)
    }

    /// Number of live instances, orphans included.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of pitches with a registered instance.
    pub fn pitch_count(&self) -> usize {
        self.by_pitch.len()
    }
}

impl<I> Default for Registry<I> {
    fn default() -> Self {
        Self::new()
    }
}
