//! Histogram arithmetic used when preparing comparison plots and reports.
//!
//! All operations return new histograms; the inputs are never modified.

use crate::error::OpsError;
use crate::histogram::{Axis, HistKind, Histogram};

fn check_compatible(lhs: &Histogram, rhs: &Histogram) -> Result<(), OpsError> {
    if lhs.kind != rhs.kind || lhs.cell_count() != rhs.cell_count() {
        return Err(OpsError::Incompatible {
            lhs_kind: lhs.kind,
            lhs_cells: lhs.cell_count(),
            rhs_kind: rhs.kind,
            rhs_cells: rhs.cell_count(),
        });
    }
    Ok(())
}

fn require_2d(hist: &Histogram) -> Result<(), OpsError> {
    if hist.kind != HistKind::H2D {
        return Err(OpsError::WrongDimension {
            expected: HistKind::H2D,
            found: hist.kind,
        });
    }
    Ok(())
}

/// Multiply every content and error by `factor`.
pub fn scale(hist: &Histogram, factor: f64) -> Histogram {
    let mut result = hist.clone();
    result.materialize_errors();
    for c in &mut result.contents {
        *c *= factor;
    }
    for e in &mut result.errors {
        *e *= factor.abs();
    }
    result
}

/// Sum of contents over in-range cells; under/overflow cells are excluded.
pub fn integral(hist: &Histogram) -> f64 {
    let Some(x_axis) = hist.axes.first() else {
        return 0.0;
    };
    let nx = x_axis.cells();
    let ny = hist.axes.get(1).map_or(1, Axis::cells);
    let ys = hist.axes.get(1).map_or(0..=0, |a| 1..=a.bins);
    let zs = hist.axes.get(2).map_or(0..=0, |a| 1..=a.bins);

    let mut sum = 0.0;
    for z in zs {
        for y in ys.clone() {
            for x in 1..=x_axis.bins {
                sum += hist.content(x + nx * (y + ny * z));
            }
        }
    }
    sum
}

/// Scale to unit integral.
pub fn area_normalize(hist: &Histogram) -> Result<Histogram, OpsError> {
    let area = integral(hist);
    if area == 0.0 {
        return Err(OpsError::ZeroIntegral);
    }
    Ok(scale(hist, 1.0 / area))
}

/// Normalize each row of a 2D histogram (cells `0..=ny`, summed over
/// `0..=nx`) to unit sum. Empty rows and the overflow row are untouched.
pub fn row_normalize(hist: &Histogram) -> Result<Histogram, OpsError> {
    require_2d(hist)?;
    let mut result = hist.clone();
    let (nx, ny) = (hist.axes[0].bins, hist.axes[1].bins);

    for y in 0..=ny {
        let row_sum: f64 = (0..=nx).map(|x| result.content(result.cell_2d(x, y))).sum();
        if row_sum != 0.0 {
            for x in 0..=nx {
                let cell = result.cell_2d(x, y);
                result.contents[cell] /= row_sum;
            }
        }
    }
    Ok(result)
}

/// Column counterpart of [`row_normalize`].
pub fn column_normalize(hist: &Histogram) -> Result<Histogram, OpsError> {
    require_2d(hist)?;
    let mut result = hist.clone();
    let (nx, ny) = (hist.axes[0].bins, hist.axes[1].bins);

    for x in 0..=nx {
        let col_sum: f64 = (0..=ny).map(|y| result.content(result.cell_2d(x, y))).sum();
        if col_sum != 0.0 {
            for y in 0..=ny {
                let cell = result.cell_2d(x, y);
                result.contents[cell] /= col_sum;
            }
        }
    }
    Ok(result)
}

/// Cellwise ratio with uncorrelated error propagation. Cells with an
/// empty denominator are set to zero.
pub fn divide(num: &Histogram, den: &Histogram) -> Result<Histogram, OpsError> {
    check_compatible(num, den)?;
    let mut result = num.clone();
    result.materialize_errors();

    for cell in 0..result.cell_count() {
        let (a, b) = (num.content(cell), den.content(cell));
        let (e1, e2) = (num.error(cell), den.error(cell));
        if b == 0.0 {
            result.contents[cell] = 0.0;
            result.errors[cell] = 0.0;
            continue;
        }
        result.contents[cell] = a / b;
        result.errors[cell] = (e1 * e1 * b * b + e2 * e2 * a * a).sqrt() / (b * b);
    }
    Ok(result)
}

/// Cellwise ratio `r = a / b` with binomial errors, for efficiencies where
/// the numerator is a subset of the denominator.
pub fn divide_binomial(num: &Histogram, den: &Histogram) -> Result<Histogram, OpsError> {
    check_compatible(num, den)?;
    let mut result = num.clone();
    result.materialize_errors();

    for cell in 0..result.cell_count() {
        let (a, b) = (num.content(cell), den.content(cell));
        let (e1, e2) = (num.error(cell), den.error(cell));
        if b == 0.0 {
            result.contents[cell] = 0.0;
            result.errors[cell] = 0.0;
            continue;
        }
        let r = a / b;
        result.contents[cell] = r;
        result.errors[cell] = (((1.0 - 2.0 * r) * e1 * e1 + r * r * e2 * e2) / (b * b))
            .abs()
            .sqrt();
    }
    Ok(result)
}
