//! Objects stored in a histogram set.
//!
//! The kind of every object is decided once, when the file is parsed, so
//! callers match on `Entry` instead of probing an object's capabilities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::histogram::Histogram;

/// One named object of a histogram set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    /// A plain histogram.
    Simple(Histogram),
    /// A histogram carrying systematic error bands.
    Banded(BandedHistogram),
    /// Anything else; only its class tag is known.
    Other(OtherObject),
}

impl Entry {
    /// Short tag used in diagnostics when two entries have different variants.
    pub fn type_tag(&self) -> &str {
        match self {
            Entry::Simple(h) => h.kind.class_name(),
            Entry::Banded(_) => "banded histogram",
            Entry::Other(o) => &o.class_name,
        }
    }

    /// The central histogram, if this entry is histogram-like.
    pub fn histogram(&self) -> Option<&Histogram> {
        match self {
            Entry::Simple(h) => Some(h),
            Entry::Banded(b) => Some(&b.central),
            Entry::Other(_) => None,
        }
    }

    /// Visit every histogram of this entry, central first, each with the
    /// path used to name it in errors (`name/band/universe i`).
    pub(crate) fn try_for_each_histogram<E>(
        &self,
        name: &str,
        mut f: impl FnMut(&str, &Histogram) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Entry::Simple(h) => f(name, h),
            Entry::Banded(b) => {
                f(name, &b.central)?;
                for (band_name, band) in &b.bands {
                    let path = format!("{}/{}", name, band_name);
                    f(&path, &band.cv)?;
                    for (i, universe) in band.universes.iter().enumerate() {
                        f(&format!("{}/universe {}", path, i), universe)?;
                    }
                }
                Ok(())
            }
            Entry::Other(_) => Ok(()),
        }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), InputError> {
        self.try_for_each_histogram(name, |path, h| h.validate(path))
    }
}

/// Histogram with named systematic error bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandedHistogram {
    pub central: Histogram,
    #[serde(default)]
    pub bands: BTreeMap<String, ErrorBand>,
}

impl BandedHistogram {
    pub fn new(central: Histogram) -> Self {
        Self {
            central,
            bands: BTreeMap::new(),
        }
    }

    /// Add a band whose CV is a copy of the central histogram.
    pub fn add_band(&mut self, name: impl Into<String>, universes: Vec<Histogram>) {
        let band = ErrorBand {
            cv: self.central.clone(),
            universes,
        };
        self.bands.insert(name.into(), band);
    }

    pub fn band(&self, name: &str) -> Option<&ErrorBand> {
        self.bands.get(name)
    }

    /// Remove a band and hand it back.
    pub fn pop_band(&mut self, name: &str) -> Option<ErrorBand> {
        self.bands.remove(name)
    }

    /// Copy the central histogram into the CV of every band. Each band
    /// evaluates its covariance contribution against its own CV copy, so the
    /// copies must track the central value.
    pub fn sync_cv(&mut self) {
        for band in self.bands.values_mut() {
            band.cv = self.central.clone();
        }
    }
}

/// A systematic variation: its own CV plus one histogram per universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBand {
    pub cv: Histogram,
    #[serde(default)]
    pub universes: Vec<Histogram>,
}

impl ErrorBand {
    pub fn universe_count(&self) -> usize {
        self.universes.len()
    }
}

/// A non-histogram object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherObject {
    pub class_name: String,
}

impl OtherObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}
