use std::path::Path;

use ndarray::{s, Array2};

use crate::error::{CoalignError, Result};
use crate::frame::RasterBounds;

/// Load a grayscale image file as `f64` samples in `[0.0, 1.0]`.
pub fn load_raster(path: &Path) -> Result<Array2<f64>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();

    Ok(Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f64 / 65535.0
    }))
}

/// Width and height of an image file without decoding its pixels.
pub fn raster_dimensions(path: &Path) -> Result<(usize, usize)> {
    let (w, h) = image::image_dimensions(path)?;
    Ok((w as usize, h as usize))
}

/// Copy the `bounds` window out of `data`.
pub fn crop_raster(data: &Array2<f64>, bounds: RasterBounds) -> Result<Array2<f64>> {
    let (h, w) = data.dim();
    if bounds.x1 >= bounds.x2 || bounds.y1 >= bounds.y2 {
        return Err(CoalignError::InvalidBounds(format!(
            "empty window x {}..{}, y {}..{}",
            bounds.x1, bounds.x2, bounds.y1, bounds.y2
        )));
    }
    if bounds.x2 > w || bounds.y2 > h {
        return Err(CoalignError::InvalidBounds(format!(
            "window x {}..{}, y {}..{} exceeds raster dimensions ({w}x{h})",
            bounds.x1, bounds.x2, bounds.y1, bounds.y2
        )));
    }

    Ok(data
        .slice(s![bounds.y1..bounds.y2, bounds.x1..bounds.x2])
        .to_owned())
}
