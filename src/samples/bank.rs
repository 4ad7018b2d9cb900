//! Sample bank: sample data keyed by sample name (`Db4`).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::log::EventLog;
use crate::theory::SampleKey;

use super::sample::{SampleData, SampleError};

#[derive(Debug, Clone, Default)]
pub struct SampleBank {
    samples: HashMap<SampleKey, SampleData>,
}

impl SampleBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SampleKey, data: SampleData) {
        self.samples.insert(key, data);
    }

    pub fn get(&self, key: &SampleKey) -> Option<&SampleData> {
        self.samples.get(key)
    }

    pub fn contains(&self, key: &SampleKey) -> bool {
        self.samples.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Keys in bank, sorted by pitch.
    pub fn keys(&self) -> Vec<SampleKey> {
        let mut keys: Vec<SampleKey> = self.samples.keys().copied().collect();
        keys.sort_by_key(|k| (k.midi_number(), k.spelling.flat));
        keys
    }

    /// Load every `<key>.wav` in `dir`, resampled to `sample_rate`.
    ///
    /// Files whose stem is not a sample key are ignored; files that fail to
    /// decode are skipped with a warning in `log`. Only an unreadable
    /// directory is an error.
    pub fn load_dir(dir: &Path, sample_rate: u32, log: &mut EventLog) -> Result<Self, SampleError> {
        let mut bank = Self::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_wav = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
            if !is_wav {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<SampleKey>().ok())
            else {
                continue;
            };
            match SampleData::from_path(&path, sample_rate) {
                Ok(data) => bank.insert(key, data),
                Err(e) => log.warn(format!("skipping {}: {e}", path.display())),
            }
        }
        log.info(format!(
            "loaded {} samples from {}",
            bank.len(),
            dir.display()
        ));
        Ok(bank)
    }
}
