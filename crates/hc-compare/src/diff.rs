//! Histogram set diffing.
//!
//! Walks two `HistogramSet`s name by name, descending into error bands and
//! their universes, and produces a list of `Diagnostic` entries classified
//! by `MismatchKind`. Scanning never stops early: only the comparison of a
//! single histogram pair stops at its first offending cell.

use hc_core::{BandedHistogram, Entry, Histogram, HistogramSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::report::ComparisonReport;

/// Default absolute tolerance on contents and errors.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// How important a difference is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Severity::Minor => write!(f, "MINOR"),
            Severity::Major => write!(f, "MAJOR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Class of a discrepancy between the two sides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum MismatchKind {
    #[strum(serialize = "CONTENT")]
    ContentMismatch,
    #[strum(serialize = "ERROR")]
    ErrorMismatch,
    #[strum(serialize = "MISSING")]
    MissingOnRight,
    #[strum(serialize = "EXTRA")]
    ExtraOnRight,
    #[strum(serialize = "SHAPE")]
    ShapeMismatch,
    #[strum(serialize = "TYPE")]
    TypeMismatch,
}

impl MismatchKind {
    /// Process exit code for this kind of failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            MismatchKind::ContentMismatch => 1,
            MismatchKind::ErrorMismatch => 2,
            MismatchKind::MissingOnRight => 3,
            MismatchKind::ExtraOnRight => 4,
            MismatchKind::ShapeMismatch | MismatchKind::TypeMismatch => 5,
        }
    }

    pub const fn severity(&self) -> Severity {
        match self {
            MismatchKind::ErrorMismatch => Severity::Minor,
            MismatchKind::ContentMismatch
            | MismatchKind::MissingOnRight
            | MismatchKind::ExtraOnRight => Severity::Major,
            MismatchKind::ShapeMismatch | MismatchKind::TypeMismatch => Severity::Critical,
        }
    }
}

/// Which property of an object differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// The object as a whole (presence, type).
    Object,
    /// A single cell.
    Bin(usize),
    /// Total number of cells.
    Cells,
    /// Class / dimensionality tag.
    Class,
    /// Number of universes in an error band.
    Universes,
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Location::Object => Ok(()),
            Location::Bin(i) => write!(f, " bin {}", i),
            Location::Cells => write!(f, " cell count"),
            Location::Class => write!(f, " class"),
            Location::Universes => write!(f, " universe count"),
        }
    }
}

/// A single difference between the two sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: MismatchKind,
    /// Path of the object: `name`, `name/band` or `name/band/universe i`.
    pub object: String,
    pub location: Location,
    pub lhs_value: String,
    pub rhs_value: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Cell index, for content and error mismatches.
    pub fn bin(&self) -> Option<usize> {
        match self.location {
            Location::Bin(i) => Some(i),
            _ => None,
        }
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}] {}{}: lhs={}, rhs={}",
            self.kind, self.object, self.location, self.lhs_value, self.rhs_value
        )
    }
}

const ABSENT: &str = "<absent>";

/// Comparison settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Largest absolute difference still treated as equal.
    pub tolerance: f64,
    /// Also compare the central histogram of banded entries, not just
    /// their bands.
    pub compare_central: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            compare_central: false,
        }
    }
}

impl CompareOptions {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

/// True if `a` and `b` differ by more than `tolerance`. Two NaNs are equal,
/// a NaN and a number are not.
fn differs(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b || (a.is_nan() && b.is_nan()) {
        return false;
    }
    !((a - b).abs() <= tolerance)
}

/// Compare two histograms cell by cell.
///
/// Returns the first discrepancy, or `None` if they agree. A cell-count or
/// class difference is reported without looking at any cell. Cells
/// `0..=cell_count` are visited; the last one reads as zero on both sides.
pub fn compare_histograms(
    object: &str,
    lhs: &Histogram,
    rhs: &Histogram,
    tolerance: f64,
) -> Option<Diagnostic> {
    let cells = lhs.cell_count();
    if cells != rhs.cell_count() {
        return Some(Diagnostic {
            kind: MismatchKind::ShapeMismatch,
            object: object.into(),
            location: Location::Cells,
            lhs_value: cells.to_string(),
            rhs_value: rhs.cell_count().to_string(),
        });
    }

    if lhs.kind != rhs.kind {
        return Some(Diagnostic {
            kind: MismatchKind::ShapeMismatch,
            object: object.into(),
            location: Location::Class,
            lhs_value: lhs.kind.to_string(),
            rhs_value: rhs.kind.to_string(),
        });
    }

    for cell in 0..=cells {
        let (l, r) = (lhs.content(cell), rhs.content(cell));
        if differs(l, r, tolerance) {
            return Some(Diagnostic {
                kind: MismatchKind::ContentMismatch,
                object: object.into(),
                location: Location::Bin(cell),
                lhs_value: format!("{:?}", l),
                rhs_value: format!("{:?}", r),
            });
        }

        let (l, r) = (lhs.error(cell), rhs.error(cell));
        if differs(l, r, tolerance) {
            return Some(Diagnostic {
                kind: MismatchKind::ErrorMismatch,
                object: object.into(),
                location: Location::Bin(cell),
                lhs_value: format!("{:?}", l),
                rhs_value: format!("{:?}", r),
            });
        }
    }

    trace!("{} matches in all {} cells", object, cells);
    None
}

/// Compare two histogram sets and collect every discrepancy.
///
/// Names only on the right are reported first, then every name on the left
/// is checked in sorted order.
pub fn compare_sets(
    lhs: &HistogramSet,
    rhs: &HistogramSet,
    options: &CompareOptions,
) -> ComparisonReport {
    let mut report = ComparisonReport::new(options.tolerance);

    for name in rhs.names() {
        if !lhs.contains(name) {
            report.push(presence_diff(MismatchKind::ExtraOnRight, name, ABSENT, rhs_tag(rhs, name)));
        }
    }

    for (name, left) in lhs.iter() {
        let Some(right) = rhs.get(name) else {
            report.push(presence_diff(
                MismatchKind::MissingOnRight,
                name,
                left.type_tag(),
                ABSENT,
            ));
            continue;
        };

        debug!("comparing {} ({} vs {})", name, left.type_tag(), right.type_tag());
        diff_entries(&mut report, name, left, right, options);
    }

    report
}

fn rhs_tag<'a>(set: &'a HistogramSet, name: &str) -> &'a str {
    set.get(name).map(Entry::type_tag).unwrap_or(ABSENT)
}

fn presence_diff(kind: MismatchKind, object: &str, lhs: &str, rhs: &str) -> Diagnostic {
    Diagnostic {
        kind,
        object: object.into(),
        location: Location::Object,
        lhs_value: lhs.into(),
        rhs_value: rhs.into(),
    }
}

fn diff_entries(
    report: &mut ComparisonReport,
    name: &str,
    left: &Entry,
    right: &Entry,
    options: &CompareOptions,
) {
    match (left, right) {
        (Entry::Banded(l), Entry::Banded(r)) => diff_banded(report, name, l, r, options),
        (Entry::Simple(l), Entry::Simple(r)) => {
            diff_pair(report, name, l, r, options.tolerance);
        }
        (Entry::Other(l), Entry::Other(r)) => {
            if l.class_name != r.class_name {
                report.push(Diagnostic {
                    kind: MismatchKind::TypeMismatch,
                    object: name.into(),
                    location: Location::Class,
                    lhs_value: l.class_name.clone(),
                    rhs_value: r.class_name.clone(),
                });
            }
        }
        _ => report.push(Diagnostic {
            kind: MismatchKind::TypeMismatch,
            object: name.into(),
            location: Location::Class,
            lhs_value: left.type_tag().into(),
            rhs_value: right.type_tag().into(),
        }),
    }
}

fn diff_pair(report: &mut ComparisonReport, object: &str, l: &Histogram, r: &Histogram, tolerance: f64) {
    report.count_compared();
    if let Some(d) = compare_histograms(object, l, r, tolerance) {
        report.push(d);
    }
}

fn diff_banded(
    report: &mut ComparisonReport,
    name: &str,
    left: &BandedHistogram,
    right: &BandedHistogram,
    options: &CompareOptions,
) {
    if options.compare_central {
        diff_pair(report, name, &left.central, &right.central, options.tolerance);
    }

    for (band_name, band) in &left.bands {
        let path = format!("{}/{}", name, band_name);
        let Some(found) = right.band(band_name) else {
            report.push(presence_diff(MismatchKind::MissingOnRight, &path, "error band", ABSENT));
            continue;
        };

        // CVs first, then every universe by position
        diff_pair(report, &path, &band.cv, &found.cv, options.tolerance);

        if band.universe_count() != found.universe_count() {
            report.push(Diagnostic {
                kind: MismatchKind::ShapeMismatch,
                object: path.clone(),
                location: Location::Universes,
                lhs_value: band.universe_count().to_string(),
                rhs_value: found.universe_count().to_string(),
            });
        }

        for (i, (l, r)) in band.universes.iter().zip(&found.universes).enumerate() {
            let universe = format!("{}/universe {}", path, i);
            diff_pair(report, &universe, l, r, options.tolerance);
        }
    }

    for band_name in right.bands.keys() {
        if !left.bands.contains_key(band_name) {
            let path = format!("{}/{}", name, band_name);
            report.push(presence_diff(MismatchKind::ExtraOnRight, &path, ABSENT, "error band"));
        }
    }
}
