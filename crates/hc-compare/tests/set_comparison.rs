//! Set-level comparison behavior: presence checks, traversal of error
//! bands and universes, and summary codes.

use hc_compare::{
    CompareOptions, DEFAULT_TOLERANCE, Location, MismatchKind, Status, SummaryPolicy,
    compare_sets,
};
use hc_core::{Axis, BandedHistogram, Histogram, HistogramSet};
use proptest::prelude::*;

fn options() -> CompareOptions {
    CompareOptions::default()
}

fn flux(second: f64) -> HistogramSet {
    HistogramSet::new().with_simple(
        "Flux",
        Histogram::from_cells(&[(1.0, 0.1), (second, 0.2)]),
    )
}

fn banded(universes: &[f64]) -> BandedHistogram {
    let mut b = BandedHistogram::new(Histogram::from_bins(&[(5.0, 1.0), (6.0, 1.0)]));
    let universes = universes
        .iter()
        .map(|&v| Histogram::from_bins(&[(v, 1.0), (6.0, 1.0)]))
        .collect();
    b.add_band("GENIE_MaRES", universes);
    b
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_flux_match() {
    let report = compare_sets(&flux(2.0), &flux(2.0), &options());
    assert!(report.passed());
    assert_eq!(report.status(SummaryPolicy::Last), Status::Match);
    assert_eq!(report.exit_code(SummaryPolicy::Last), 0);
    assert_eq!(report.histograms_compared, 1);
}

#[test]
fn test_flux_content_mismatch() {
    let report = compare_sets(&flux(2.0), &flux(2.5), &options());
    assert_eq!(report.exit_code(SummaryPolicy::Last), 1);
    assert_eq!(report.diagnostics.len(), 1);

    let d = &report.diagnostics[0];
    assert_eq!(d.kind, MismatchKind::ContentMismatch);
    assert_eq!(d.object, "Flux");
    assert_eq!(d.bin(), Some(1));
    assert_eq!(d.lhs_value, "2.0");
    assert_eq!(d.rhs_value, "2.5");
    assert_eq!(d.to_string(), "[CONTENT] Flux bin 1: lhs=2.0, rhs=2.5");
}

// ============================================================================
// Tolerance
// ============================================================================

#[test]
fn test_tolerance_boundary() {
    let tol = DEFAULT_TOLERANCE;
    let single = |v: f64| HistogramSet::new().with_simple("h", Histogram::from_bins(&[(v, 0.0)]));

    let over = compare_sets(&single(1.0), &single(1.0 + tol * 1.0000001), &options());
    assert_eq!(over.last_status(), Status::Mismatch(MismatchKind::ContentMismatch));

    let under = compare_sets(&single(1.0), &single(1.0 + tol * 0.9999999), &options());
    assert_eq!(under.last_status(), Status::Match);
}

#[test]
fn test_custom_tolerance() {
    let loose = CompareOptions::with_tolerance(0.6);
    assert!(compare_sets(&flux(2.0), &flux(2.5), &loose).passed());
}

// ============================================================================
// Shapes and types
// ============================================================================

#[test]
fn test_shape_short_circuit() {
    let lhs = HistogramSet::new().with_simple("h", Histogram::new_1d(10, 0.0, 1.0));
    let mut wide = Histogram::new_1d(12, 0.0, 1.0);
    wide.contents[3] = 99.0;
    let rhs = HistogramSet::new().with_simple("h", wide);

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    let d = &report.diagnostics[0];
    assert_eq!(d.kind, MismatchKind::ShapeMismatch);
    assert_eq!(d.location, Location::Cells);
    assert_eq!((d.lhs_value.as_str(), d.rhs_value.as_str()), ("12", "14"));
    assert_eq!(report.count(MismatchKind::ContentMismatch), 0);
    assert_eq!(report.exit_code(SummaryPolicy::Last), 5);
}

#[test]
fn test_other_objects_compare_class_names() {
    let lhs = HistogramSet::new().with_other("POTUsed", "TParameter<double>");
    let same = HistogramSet::new().with_other("POTUsed", "TParameter<double>");
    let diff = HistogramSet::new().with_other("POTUsed", "TNamed");

    assert!(compare_sets(&lhs, &same, &options()).passed());
    let report = compare_sets(&lhs, &diff, &options());
    assert_eq!(report.last_status(), Status::Mismatch(MismatchKind::TypeMismatch));
    assert_eq!(report.exit_code(SummaryPolicy::Last), 5);
}

#[test]
fn test_mixed_variants_are_type_mismatch() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0]));
    let rhs = HistogramSet::new().with_simple("XSec", Histogram::from_bins(&[(5.0, 1.0)]));

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, MismatchKind::TypeMismatch);
    assert_eq!(report.diagnostics[0].rhs_value, "TH1D");
}

// ============================================================================
// Presence
// ============================================================================

#[test]
fn test_missing_on_right() {
    let h1 = Histogram::from_bins(&[(1.0, 1.0)]);
    let h2 = Histogram::from_bins(&[(2.0, 1.0)]);
    let lhs = HistogramSet::new()
        .with_simple("A", h1.clone())
        .with_simple("B", h2);
    let rhs = HistogramSet::new().with_simple("A", h1);

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.count(MismatchKind::MissingOnRight), 1);
    assert_eq!(report.diagnostics[0].object, "B");
    assert_eq!(report.exit_code(SummaryPolicy::Last), 3);
}

#[test]
fn test_extra_on_right() {
    let h1 = Histogram::from_bins(&[(1.0, 1.0)]);
    let lhs = HistogramSet::new().with_simple("A", h1.clone());
    let rhs = HistogramSet::new()
        .with_simple("A", h1)
        .with_simple("C", Histogram::from_bins(&[(3.0, 1.0)]));

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.count(MismatchKind::ExtraOnRight), 1);
    assert_eq!(report.diagnostics[0].object, "C");
    assert_eq!(report.exit_code(SummaryPolicy::Last), 4);
}

#[test]
fn test_last_status_follows_scan_order() {
    // extras are scanned first, so a later missing entry wins
    let lhs = HistogramSet::new().with_simple("A", Histogram::from_bins(&[(1.0, 1.0)]));
    let rhs = HistogramSet::new().with_simple("Z", Histogram::from_bins(&[(1.0, 1.0)]));

    let report = compare_sets(&lhs, &rhs, &options());
    let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [MismatchKind::ExtraOnRight, MismatchKind::MissingOnRight]);
    assert_eq!(report.exit_code(SummaryPolicy::Last), 3);
    assert_eq!(report.exit_code(SummaryPolicy::MostSevere), 3);
}

// ============================================================================
// Error bands and universes
// ============================================================================

#[test]
fn test_universe_mismatch_reported_once() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0, 5.0]));
    let rhs = HistogramSet::new().with_banded("XSec", banded(&[5.0, 5.5]));

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    let d = &report.diagnostics[0];
    assert_eq!(d.kind, MismatchKind::ContentMismatch);
    assert_eq!(d.object, "XSec/GENIE_MaRES/universe 1");
    assert_eq!(d.bin(), Some(1));
    // band CV plus two universes
    assert_eq!(report.histograms_compared, 3);
}

#[test]
fn test_band_cv_compared() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0]));
    let mut shifted = banded(&[5.0]);
    shifted.bands.get_mut("GENIE_MaRES").unwrap().cv.errors[2] = 3.0;
    let rhs = HistogramSet::new().with_banded("XSec", shifted);

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, MismatchKind::ErrorMismatch);
    assert_eq!(report.diagnostics[0].object, "XSec/GENIE_MaRES");
}

#[test]
fn test_central_only_compared_on_request() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0]));
    let mut moved = banded(&[5.0]);
    moved.central.contents[1] = 50.0;
    let rhs = HistogramSet::new().with_banded("XSec", moved);

    assert!(compare_sets(&lhs, &rhs, &options()).passed());

    let strict = CompareOptions {
        compare_central: true,
        ..options()
    };
    let report = compare_sets(&lhs, &rhs, &strict);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].object, "XSec");
}

#[test]
fn test_missing_band_on_right() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0]));
    let mut bare = banded(&[5.0]);
    bare.pop_band("GENIE_MaRES");
    let rhs = HistogramSet::new().with_banded("XSec", bare);

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, MismatchKind::MissingOnRight);
    assert_eq!(report.diagnostics[0].object, "XSec/GENIE_MaRES");
    assert_eq!(report.histograms_compared, 0);
}

#[test]
fn test_extra_band_on_right() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[5.0]));
    let mut more = banded(&[5.0]);
    more.add_band("Flux", vec![]);
    let rhs = HistogramSet::new().with_banded("XSec", more);

    let report = compare_sets(&lhs, &rhs, &options());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, MismatchKind::ExtraOnRight);
    assert_eq!(report.diagnostics[0].object, "XSec/Flux");
}

#[test]
fn test_universe_count_mismatch_still_compares_prefix() {
    let lhs = HistogramSet::new().with_banded("XSec", banded(&[7.0, 5.0, 5.0]));
    let rhs = HistogramSet::new().with_banded("XSec", banded(&[5.0, 5.0]));

    let report = compare_sets(&lhs, &rhs, &options());
    let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [MismatchKind::ShapeMismatch, MismatchKind::ContentMismatch]);
    assert_eq!(report.diagnostics[0].location, Location::Universes);
    assert_eq!(report.diagnostics[1].object, "XSec/GENIE_MaRES/universe 0");
    assert_eq!(report.exit_code(SummaryPolicy::Last), 1);
    assert_eq!(report.exit_code(SummaryPolicy::MostSevere), 5);
}

#[test]
fn test_two_dimensional_universes() {
    let mut central = Histogram::new_2d(Axis::new(2, 0.0, 1.0), Axis::new(3, 0.0, 1.0));
    central.contents[7] = 4.0;
    let mut b = BandedHistogram::new(central.clone());
    let mut universe = central.clone();
    universe.contents[7] = 4.0 + 1e-9;
    b.add_band("Flux", vec![universe]);

    let lhs = HistogramSet::new().with_banded("PT_PZ", b.clone());
    let rhs = HistogramSet::new().with_banded("PT_PZ", b);
    assert!(compare_sets(&lhs, &rhs, &options()).passed());
}

// ============================================================================
// Properties
// ============================================================================

fn arb_histogram() -> impl Strategy<Value = Histogram> {
    (
        prop::collection::vec((-1e6f64..1e6, 0f64..1e3), 0..20),
        prop::bool::ANY,
    )
        .prop_map(|(bins, stored_errors)| {
            let mut hist = Histogram::from_bins(&bins);
            if !stored_errors {
                hist.errors.clear();
            }
            hist
        })
}

#[derive(Debug, Clone)]
enum ArbEntry {
    Simple(Histogram),
    Banded(Histogram),
    Other(String),
}

fn arb_entry() -> impl Strategy<Value = ArbEntry> {
    prop_oneof![
        arb_histogram().prop_map(ArbEntry::Simple),
        arb_histogram().prop_map(ArbEntry::Banded),
        "T[A-Za-z<>]{1,12}".prop_map(ArbEntry::Other),
    ]
}

fn arb_set() -> impl Strategy<Value = HistogramSet> {
    prop::collection::btree_map("[A-Za-z_]{1,8}", arb_entry(), 0..6).prop_map(|entries| {
        let mut set = HistogramSet::new();
        for (name, entry) in entries {
            set = match entry {
                ArbEntry::Simple(hist) => set.with_simple(name, hist),
                ArbEntry::Banded(hist) => {
                    let mut b = BandedHistogram::new(hist.clone());
                    b.add_band("band", vec![hist.clone(), hist]);
                    set.with_banded(name, b)
                }
                ArbEntry::Other(class_name) => set.with_other(name, &class_name),
            };
        }
        set
    })
}

proptest! {
    #[test]
    fn prop_comparison_is_reflexive(set in arb_set()) {
        let copy = set.clone();
        let report = compare_sets(&set, &copy, &CompareOptions::default());
        prop_assert!(report.passed());
        prop_assert_eq!(report.exit_code(SummaryPolicy::Last), 0);
    }
}
