use ndarray::Array2;

use crate::error::Result;
use crate::frame::{FrameHeader, RasterBounds};

/// Per-frame scalar metadata (acquisition time, raw cube dimensions).
pub trait HeaderSource {
    fn header(&self, id: &str) -> Result<FrameHeader>;
}

/// 2D raster extraction from a raw frame.
pub trait FrameSource {
    /// Raster of frame `id` at `wavelength`, cropped to `bounds`.
    fn raster(&self, id: &str, wavelength: f64, bounds: RasterBounds) -> Result<Array2<f64>>;
}
