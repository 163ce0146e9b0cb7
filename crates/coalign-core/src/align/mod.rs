pub mod cross_correlation;
mod estimator;
mod fft;
pub mod subpixel;
pub mod window;

pub use cross_correlation::{
    correlation_surface, estimate_offset, estimate_offset_dyn, estimate_offset_stack,
};
pub use estimator::{CorrelationEstimator, ShiftEstimator};
