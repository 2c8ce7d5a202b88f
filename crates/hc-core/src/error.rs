//! Error types for loading histogram files and operating on histograms.

use std::path::PathBuf;
use thiserror::Error;

use crate::histogram::HistKind;

/// Problems with an input file, raised before any comparison starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a histogram set: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid object '{object}': {reason}")]
    Invalid { object: String, reason: String },

    #[error("no object named '{name}'")]
    NotFound { name: String },
}

/// Precondition failures of histogram arithmetic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpsError {
    #[error("histograms are incompatible: {lhs_kind} with {lhs_cells} cells vs {rhs_kind} with {rhs_cells} cells")]
    Incompatible {
        lhs_kind: HistKind,
        lhs_cells: usize,
        rhs_kind: HistKind,
        rhs_cells: usize,
    },

    #[error("operation needs a {expected} histogram, got {found}")]
    WrongDimension { expected: HistKind, found: HistKind },

    #[error("cannot normalize a histogram with zero integral")]
    ZeroIntegral,

    #[error("object '{name}' is not a histogram")]
    NotAHistogram { name: String },
}
