use std::ops::Add;

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Translation of an image relative to its template, in pixels.
/// Positive values mean the image content sits further along the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// One offset per plane of an image stack, as parallel sequences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl OffsetSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Offset> {
        Some(Offset::new(*self.x.get(index)?, *self.y.get(index)?))
    }
}

impl FromIterator<Offset> for OffsetSeries {
    fn from_iter<I: IntoIterator<Item = Offset>>(iter: I) -> Self {
        let mut series = OffsetSeries::default();
        for offset in iter {
            series.x.push(offset.x);
            series.y.push(offset.y);
        }
        series
    }
}

/// Result of a rank-dispatched estimation: one offset for a 2D image,
/// a series for a 3D stack.
#[derive(Clone, Debug, PartialEq)]
pub enum OffsetEstimate {
    Single(Offset),
    Stack(OffsetSeries),
}

/// Cumulative displacement of every frame of a sequence relative to frame 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.dx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dx.is_empty()
    }

    pub fn offset(&self, index: usize) -> Option<Offset> {
        Some(Offset::new(*self.dx.get(index)?, *self.dy.get(index)?))
    }
}

/// Scalar metadata of one raw frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameHeader {
    /// Acquisition time.
    pub timestamp: DateTime<Utc>,
    /// Spatial extent along x (scan direction) of the raw cube.
    pub nx: usize,
    /// Spatial extent along y (slit direction) of the raw cube.
    pub ny: usize,
    /// Spectral length of the raw cube.
    pub nwave: usize,
}

/// Half-open pixel window `[x1, x2) x [y1, y2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterBounds {
    pub x1: usize,
    pub x2: usize,
    pub y1: usize,
    pub y2: usize,
}

impl RasterBounds {
    pub fn width(&self) -> usize {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> usize {
        self.y2.saturating_sub(self.y1)
    }
}

/// Absolute pixel coordinates of the columns (`x`) and rows (`y`) an image sits on.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateGrid {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

impl CoordinateGrid {
    /// A unit-spaced grid starting at `(x0, y0)`.
    pub fn regular(x0: f64, y0: f64, width: usize, height: usize) -> Self {
        Self {
            x: Array1::from_iter((0..width).map(|i| x0 + i as f64)),
            y: Array1::from_iter((0..height).map(|i| y0 + i as f64)),
        }
    }

    /// Grid covering an image of `(height, width)` with its origin at pixel (0, 0).
    pub fn for_shape(height: usize, width: usize) -> Self {
        Self::regular(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }
}

/// Crop window, rotation centre and coordinate grid derived from a raw
/// frame's dimensions. The crop is the central, even-sized half of the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CropGeometry {
    pub xc: usize,
    pub yc: usize,
    pub bounds: RasterBounds,
    pub grid: CoordinateGrid,
}

impl CropGeometry {
    pub fn from_header(header: &FrameHeader) -> Self {
        Self::from_dims(header.nx, header.ny)
    }

    pub fn from_dims(nx: usize, ny: usize) -> Self {
        let xc = nx / 2;
        let yc = ny / 2;
        let nx1 = ((nx / 2) / 2) * 2;
        let ny1 = ((ny / 2) / 2) * 2;
        let x1 = xc - nx1 / 2;
        let y1 = yc - ny1 / 2;

        Self {
            xc,
            yc,
            bounds: RasterBounds {
                x1,
                x2: x1 + nx1,
                y1,
                y2: y1 + ny1,
            },
            grid: CoordinateGrid::regular(x1 as f64, y1 as f64, nx1, ny1),
        }
    }

    /// Rotation centre in absolute pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.xc as f64, self.yc as f64)
    }
}
