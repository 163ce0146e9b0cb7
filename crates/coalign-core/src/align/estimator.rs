use ndarray::Array2;

use crate::error::Result;
use crate::frame::Offset;

use super::cross_correlation::estimate_offset;

/// Pairwise offset estimation as seen by the sequential aligner.
pub trait ShiftEstimator: Send + Sync {
    /// Offset of `image` relative to `template`.
    fn estimate(&self, image: &Array2<f64>, template: &Array2<f64>) -> Result<Offset>;

    /// Human-readable estimator name.
    fn name(&self) -> &str;
}

/// Windowed FFT cross-correlation with parabolic peak refinement.
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationEstimator;

impl ShiftEstimator for CorrelationEstimator {
    fn estimate(&self, image: &Array2<f64>, template: &Array2<f64>) -> Result<Offset> {
        estimate_offset(image, template)
    }

    fn name(&self) -> &str {
        "Cross-correlation"
    }
}
