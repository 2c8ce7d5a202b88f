//! Tolerance-based comparison of histogram sets.
//!
//! Provides structured diffing of two histogram files, down to error bands
//! and universes, with typed diagnostics, summary policies and exit-code
//! reporting.

pub mod diff;
pub mod report;

pub use diff::{
    CompareOptions, DEFAULT_TOLERANCE, Diagnostic, Location, MismatchKind, Severity,
    compare_histograms, compare_sets,
};
pub use report::{ComparisonReport, Status, SummaryPolicy};
