/// The apodization window's standard deviation is the axis extent divided by this.
pub const WINDOW_SIGMA_DIVISOR: f64 = 6.0;

/// Power applied to the Gaussian apodization window.
/// 0.5 gives the square root of the Gaussian, a broader taper.
pub const WINDOW_EXPONENT: f64 = 0.5;

/// Minimum plane count to use plane-level Rayon parallelism in stack estimation.
pub const PARALLEL_PLANE_THRESHOLD: usize = 4;

/// Field rotation rate of the instrument feed, in degrees per minute.
pub const DEFAULT_ROTATION_RATE_DEG_PER_MIN: f64 = 0.25;

/// Default wavelength offset (Angstrom from line centre) for raster extraction.
pub const DEFAULT_REFERENCE_WAVELENGTH: f64 = -4.0;

/// Fill value for pixels rotated in from outside the source raster.
pub const DEFAULT_FILL: f64 = 0.0;

/// Suffix of a level-0 alignment record (trajectory only).
pub const LEVEL0_SUFFIX: &str = "_align_lev0";

/// Suffix of a level-1 alignment record (trajectory plus WCS match).
pub const LEVEL1_SUFFIX: &str = "_align_lev1";

/// Suffix of the upstream WCS match record consumed when writing level 1.
pub const WCS_MATCH_SUFFIX: &str = "_match_wcs";
