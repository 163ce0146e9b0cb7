#![allow(dead_code)]

use ndarray::Array2;

/// A Gaussian spot of unit amplitude with its centre at `(cy, cx)`.
pub fn gaussian_blob(h: usize, w: usize, cy: f64, cx: f64, sigma: f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        let dy = r as f64 - cy;
        let dx = c as f64 - cx;
        (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
    })
}

/// Asymmetric test scene evaluated at absolute coordinates `(x, y)`.
pub fn scene_value(x: f64, y: f64) -> f64 {
    const SPOTS: [(f64, f64, f64, f64); 4] = [
        // (x, y, sigma, amplitude)
        (60.0, 58.0, 3.0, 1.0),
        (72.0, 66.0, 2.5, 0.7),
        (55.0, 74.0, 4.0, 0.5),
        (70.0, 52.0, 2.0, 0.8),
    ];
    SPOTS
        .iter()
        .map(|&(sx, sy, sigma, amp)| {
            let dx = x - sx;
            let dy = y - sy;
            amp * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
        })
        .sum()
}

/// The test scene sampled on pixel `(row, col) -> (x0 + col, y0 + row)`,
/// translated by `(tx, ty)` and rotated by `-angle` about `(cx, cy)`.
///
/// De-rotating such a frame by `angle` about the same centre restores the
/// translated scene.
pub fn scene_frame(
    h: usize,
    w: usize,
    origin: (f64, f64),
    center: (f64, f64),
    angle: f64,
    translation: (f64, f64),
) -> Array2<f64> {
    let (sin, cos) = angle.sin_cos();
    let (cx, cy) = center;
    Array2::from_shape_fn((h, w), |(r, c)| {
        let px = origin.0 + c as f64 - cx;
        let py = origin.1 + r as f64 - cy;
        // Inverse rotation R(-angle) maps the frame back onto the scene.
        let sx = cos * px + sin * py + cx;
        let sy = -sin * px + cos * py + cy;
        scene_value(sx - translation.0, sy - translation.1)
    })
}

/// Circular shift of `data` by `(dy, dx)` whole pixels.
pub fn roll(data: &Array2<f64>, dy: isize, dx: isize) -> Array2<f64> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        let sr = (r as isize - dy).rem_euclid(h as isize) as usize;
        let sc = (c as isize - dx).rem_euclid(w as isize) as usize;
        data[[sr, sc]]
    })
}
