//! Binned histograms in the layout of the external histogram library.
//!
//! Every axis carries one underflow and one overflow cell, so a 1D
//! histogram with `n` bins has `n + 2` cells. Cells are stored row-major
//! with the x index running fastest, matching the global bin numbering
//! `bin = x + (nx + 2) * (y + (ny + 2) * z)`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::error::InputError;

/// Class tag of a histogram. Two histograms with different kinds are never
/// compared bin by bin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
pub enum HistKind {
    #[serde(rename = "TH1D")]
    #[strum(serialize = "TH1D")]
    H1D,
    #[serde(rename = "TH2D")]
    #[strum(serialize = "TH2D")]
    H2D,
    #[serde(rename = "TH3D")]
    #[strum(serialize = "TH3D")]
    H3D,
}

impl HistKind {
    /// Number of axes a histogram of this kind has.
    pub const fn dimension(&self) -> usize {
        match self {
            HistKind::H1D => 1,
            HistKind::H2D => 2,
            HistKind::H3D => 3,
        }
    }

    /// Class name as written in histogram files.
    pub fn class_name(self) -> &'static str {
        self.into()
    }
}

/// Uniformly binned axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

impl Axis {
    pub fn new(bins: usize, low: f64, high: f64) -> Self {
        Self { bins, low, high }
    }

    /// Cells along this axis, under/overflow included.
    pub const fn cells(&self) -> usize {
        self.bins.saturating_add(2)
    }

    const fn checked_cells(&self) -> Option<usize> {
        self.bins.checked_add(2)
    }
}

/// A histogram: one content and one error per cell.
///
/// An empty `errors` vector means errors were never stored; the error of a
/// cell is then `sqrt(|content|)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub kind: HistKind,
    pub axes: Vec<Axis>,
    pub contents: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<f64>,
}

impl Histogram {
    /// Create an empty 1D histogram.
    pub fn new_1d(bins: usize, low: f64, high: f64) -> Self {
        Self::empty(HistKind::H1D, vec![Axis::new(bins, low, high)])
    }

    /// Create an empty 2D histogram.
    pub fn new_2d(x: Axis, y: Axis) -> Self {
        Self::empty(HistKind::H2D, vec![x, y])
    }

    fn empty(kind: HistKind, axes: Vec<Axis>) -> Self {
        let cells = axes.iter().map(Axis::cells).fold(1usize, usize::saturating_mul);
        Self {
            kind,
            axes,
            contents: vec![0.0; cells],
            errors: vec![0.0; cells],
        }
    }

    /// Build a 1D histogram from its in-range bins as `(content, error)`
    /// pairs. Underflow and overflow cells are left at zero.
    pub fn from_bins(bins: &[(f64, f64)]) -> Self {
        let mut hist = Self::new_1d(bins.len(), 0.0, bins.len() as f64);
        for (i, &(content, error)) in bins.iter().enumerate() {
            hist.contents[i + 1] = content;
            hist.errors[i + 1] = error;
        }
        hist
    }

    /// Build a 1D histogram from every cell as `(content, error)` pairs,
    /// underflow first and overflow last. Missing flow cells are padded
    /// with zeros.
    pub fn from_cells(cells: &[(f64, f64)]) -> Self {
        let bins = cells.len().saturating_sub(2);
        let mut hist = Self::new_1d(bins, 0.0, bins as f64);
        for (i, &(content, error)) in cells.iter().enumerate() {
            hist.contents[i] = content;
            hist.errors[i] = error;
        }
        hist
    }

    /// Total number of cells, under/overflow included. Saturates for axes
    /// no valid histogram can have; `validate` rejects those.
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    /// Total number of cells, or `None` when it does not fit in `usize`.
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.checked_cells()?))
    }

    /// Content of a cell. Indices past the last cell read as `0.0`.
    pub fn content(&self, cell: usize) -> f64 {
        self.contents.get(cell).copied().unwrap_or(0.0)
    }

    /// Error of a cell. Indices past the last cell read as `0.0`.
    pub fn error(&self, cell: usize) -> f64 {
        if self.errors.is_empty() {
            return self.content(cell).abs().sqrt();
        }
        self.errors.get(cell).copied().unwrap_or(0.0)
    }

    /// Global cell index of `(x, y)` in a 2D histogram.
    pub fn cell_2d(&self, x: usize, y: usize) -> usize {
        x + self.axes[0].cells() * y
    }

    /// Make the per-cell errors explicit so they can be modified.
    pub fn materialize_errors(&mut self) {
        if self.errors.is_empty() {
            self.errors = self.contents.iter().map(|c| c.abs().sqrt()).collect();
        }
    }

    /// Check the internal layout; `object` names the histogram in errors.
    pub fn validate(&self, object: &str) -> Result<(), InputError> {
        if self.axes.len() != self.kind.dimension() {
            return Err(InputError::Invalid {
                object: object.to_string(),
                reason: format!(
                    "{} needs {} axes, found {}",
                    self.kind,
                    self.kind.dimension(),
                    self.axes.len()
                ),
            });
        }
        let Some(cells) = self.checked_cell_count() else {
            return Err(InputError::Invalid {
                object: object.to_string(),
                reason: "cell count overflows".to_string(),
            });
        };
        if self.contents.len() != cells {
            return Err(InputError::Invalid {
                object: object.to_string(),
                reason: format!("expected {} cells, found {} contents", cells, self.contents.len()),
            });
        }
        if !self.errors.is_empty() && self.errors.len() != cells {
            return Err(InputError::Invalid {
                object: object.to_string(),
                reason: format!("expected {} cells, found {} errors", cells, self.errors.len()),
            });
        }
        Ok(())
    }

    /// Reject NaN and infinite cells; the JSON file format cannot hold them.
    pub fn check_finite(&self, object: &str) -> Result<(), InputError> {
        let bad = |values: &[f64], what: &str| {
            values.iter().position(|v| !v.is_finite()).map(|cell| InputError::Invalid {
                object: object.to_string(),
                reason: format!("{} of cell {} is {}, which cannot be stored", what, cell, values[cell]),
            })
        };
        match bad(&self.contents, "content").or_else(|| bad(&self.errors, "error")) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
