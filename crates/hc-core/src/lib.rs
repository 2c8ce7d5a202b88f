//! Histogram sets for cross-section analysis checks.
//!
//! Provides the data model shared by the comparison tooling: histogram sets
//! loaded from JSON files, histograms with systematic error bands and
//! statistical universes, and the small amount of histogram arithmetic the
//! report scripts need.

pub mod entry;
pub mod error;
pub mod histogram;
pub mod io;
pub mod ops;
pub mod set;

pub use entry::{BandedHistogram, Entry, ErrorBand, OtherObject};
pub use error::{InputError, OpsError};
pub use histogram::{Axis, HistKind, Histogram};
pub use io::{load_set, save_set};
pub use set::HistogramSet;
