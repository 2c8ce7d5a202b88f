//! Named collections of histograms, one per input file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entry::{BandedHistogram, Entry, OtherObject};
use crate::error::InputError;
use crate::histogram::Histogram;

/// The contents of one histogram file. Names are unique and iterate in
/// sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSet {
    #[serde(default)]
    entries: BTreeMap<String, Entry>,
}

impl HistogramSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(name.into(), entry)
    }

    /// Builder-style insertion of a plain histogram.
    pub fn with_simple(mut self, name: impl Into<String>, hist: Histogram) -> Self {
        self.insert(name, Entry::Simple(hist));
        self
    }

    /// Builder-style insertion of a histogram with error bands.
    pub fn with_banded(mut self, name: impl Into<String>, hist: BandedHistogram) -> Self {
        self.insert(name, Entry::Banded(hist));
        self
    }

    /// Builder-style insertion of a non-histogram object.
    pub fn with_other(mut self, name: impl Into<String>, class_name: &str) -> Self {
        self.insert(name, Entry::Other(OtherObject::new(class_name)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Like `get`, but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<&Entry, InputError> {
        self.get(name).ok_or_else(|| InputError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every histogram in the set.
    pub fn validate(&self) -> Result<(), InputError> {
        for (name, entry) in &self.entries {
            entry.validate(name)?;
        }
        Ok(())
    }

    /// Check that every cell can be written to a file.
    pub fn check_finite(&self) -> Result<(), InputError> {
        for (name, entry) in &self.entries {
            entry.try_for_each_histogram(name, |path, h| h.check_finite(path))?;
        }
        Ok(())
    }

    /// Copy the central value into the bands of every banded entry.
    /// Returns how many entries were synchronized.
    pub fn sync_cv(&mut self) -> usize {
        let mut synced = 0;
        for (name, entry) in &mut self.entries {
            match entry {
                Entry::Banded(b) => {
                    b.sync_cv();
                    synced += 1;
                }
                _ => debug!("{} has no error bands, leaving it alone", name),
            }
        }
        synced
    }

    /// Drop the named band from every banded entry. Returns how many
    /// entries carried it.
    pub fn remove_band(&mut self, band: &str) -> usize {
        let mut removed = 0;
        for (name, entry) in &mut self.entries {
            match entry {
                Entry::Banded(b) => {
                    if b.pop_band(band).is_some() {
                        removed += 1;
                    }
                }
                _ => debug!("{} has no error bands, not removing {}", name, band),
            }
        }
        removed
    }

    /// Copy one entry from another set, overwriting any entry with the
    /// same name.
    pub fn transplant(&mut self, from: &HistogramSet, name: &str) -> Result<(), InputError> {
        let entry = from.require(name)?.clone();
        self.insert(name, entry);
        Ok(())
    }
}
