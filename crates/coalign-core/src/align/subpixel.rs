use ndarray::Array2;

use crate::error::{CoalignError, Result};

/// Map a correlation index to a signed shift on a circular axis of length `len`.
///
/// Indices up to and including the midpoint are positive shifts; indices past
/// it wrap to negative shifts (`idx - len`).
pub fn wrap_index(idx: usize, len: usize) -> isize {
    if 2 * idx <= len {
        idx as isize
    } else {
        idx as isize - len as isize
    }
}

/// Index `idx + delta` on a circular axis of length `len`.
pub fn circular_index(idx: usize, delta: isize, len: usize) -> usize {
    let len = len as isize;
    (idx as isize + delta).rem_euclid(len) as usize
}

/// Row-major position of the largest absolute value. Ties keep the first hit.
pub fn find_abs_peak(data: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;

    for ((row, col), &v) in data.indexed_iter() {
        let a = v.abs();
        if a > best_val {
            best_val = a;
            best = (row, col);
        }
    }

    best
}

/// Vertex of the parabola through `(-1, left)`, `(0, center)`, `(1, right)`.
///
/// `None` when the three samples are collinear (flat or linear neighbourhood).
pub fn parabolic_vertex(left: f64, center: f64, right: f64) -> Option<f64> {
    let denom = left + right - 2.0 * center;
    if denom == 0.0 {
        return None;
    }
    let frac = 0.5 * (left - right) / denom;
    frac.is_finite().then_some(frac)
}

/// Refine an integer correlation peak to sub-pixel precision.
///
/// Fits a 1D parabola along each axis through the peak and its two direct
/// neighbours, fetched with circular wraparound. Returns `(delta_row, delta_col)`.
pub fn refine_peak_parabolic(
    correlation: &Array2<f64>,
    peak_row: usize,
    peak_col: usize,
) -> Result<(f64, f64)> {
    let (h, w) = correlation.dim();
    let at = |dr: isize, dc: isize| {
        correlation[[
            circular_index(peak_row, dr, h),
            circular_index(peak_col, dc, w),
        ]]
    };

    let center = at(0, 0);
    let degenerate = || CoalignError::DegeneratePeak {
        row: peak_row,
        col: peak_col,
    };

    let delta_row = parabolic_vertex(at(-1, 0), center, at(1, 0)).ok_or_else(degenerate)?;
    let delta_col = parabolic_vertex(at(0, -1), center, at(0, 1)).ok_or_else(degenerate)?;

    Ok((delta_row, delta_col))
}
