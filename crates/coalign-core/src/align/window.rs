use ndarray::Array2;

use crate::consts::{WINDOW_EXPONENT, WINDOW_SIGMA_DIVISOR};

/// Gaussian apodization window of shape `(height, width)`.
///
/// Centred on the array centre with a standard deviation of one sixth of each
/// axis extent, raised to the 0.5 power. Weights the correlation towards the
/// middle of the field so that fast changes near the edges (granular motion,
/// strong flows) do not drive large spurious displacements.
pub fn apodization_window(height: usize, width: usize) -> Array2<f64> {
    let sig_x = width as f64 / WINDOW_SIGMA_DIVISOR;
    let sig_y = height as f64 / WINDOW_SIGMA_DIVISOR;
    let half_x = width as f64 / 2.0;
    let half_y = height as f64 / 2.0;

    Array2::from_shape_fn((height, width), |(row, col)| {
        let u = (col as f64 - half_x) / sig_x;
        let v = (row as f64 - half_y) / sig_y;
        (-0.5 * (u * u + v * v)).exp().powf(WINDOW_EXPONENT)
    })
}
