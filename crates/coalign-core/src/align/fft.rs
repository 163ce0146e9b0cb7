use std::sync::Arc;

use ndarray::{Array2, Axis};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Forward and inverse 2D FFTs planned once for a fixed `(height, width)`.
///
/// Stack estimation transforms many planes of the same shape, so the plan is
/// shared across planes (and threads: rustfft plans are `Send + Sync`).
#[derive(Clone)]
pub(crate) struct Fft2dPlan {
    height: usize,
    width: usize,
    row_forward: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2dPlan {
    pub(crate) fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            height,
            width,
            row_forward: planner.plan_fft_forward(width),
            col_forward: planner.plan_fft_forward(height),
            row_inverse: planner.plan_fft_inverse(width),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    /// 2D FFT of a real array: row-wise FFT, then column-wise FFT.
    pub(crate) fn forward(&self, data: &Array2<f64>) -> Array2<Complex<f64>> {
        debug_assert_eq!(data.dim(), (self.height, self.width));
        let mut result = data.mapv(|v| Complex::new(v, 0.0));
        process_lanes(&mut result, Axis(1), self.row_forward.as_ref());
        process_lanes(&mut result, Axis(0), self.col_forward.as_ref());
        result
    }

    /// Inverse 2D FFT, returning the normalized real part.
    pub(crate) fn inverse_real(&self, data: &Array2<Complex<f64>>) -> Array2<f64> {
        debug_assert_eq!(data.dim(), (self.height, self.width));
        let mut work = data.clone();
        process_lanes(&mut work, Axis(0), self.col_inverse.as_ref());
        process_lanes(&mut work, Axis(1), self.row_inverse.as_ref());

        let scale = 1.0 / (self.height * self.width) as f64;
        work.mapv(|c| c.re * scale)
    }
}

/// Run `fft` in place over every 1D lane of `data` along `axis`.
fn process_lanes(data: &mut Array2<Complex<f64>>, axis: Axis, fft: &dyn Fft<f64>) {
    let mut buffer = vec![Complex::new(0.0, 0.0); data.len_of(axis)];
    for mut lane in data.lanes_mut(axis) {
        for (slot, value) in buffer.iter_mut().zip(lane.iter()) {
            *slot = *value;
        }
        fft.process(&mut buffer);
        for (value, slot) in lane.iter_mut().zip(buffer.iter()) {
            *value = *slot;
        }
    }
}
