use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FILL, DEFAULT_REFERENCE_WAVELENGTH, DEFAULT_ROTATION_RATE_DEG_PER_MIN};
use crate::error::Result;
use crate::record::RecordLevel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Wavelength (Angstrom from line centre) the rasters are extracted at.
    pub reference_wavelength: f64,
    /// Field rotation rate, degrees per minute.
    pub rotation_rate_deg_per_min: f64,
    /// Value of pixels rotated in from outside a raster.
    pub fill: f64,
    /// Persist the alignment record.
    pub save: bool,
    /// Directory records are written to; the working directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Base name of the records; the date of the first frame when unset.
    pub name: Option<String>,
    /// Merge a previously saved WCS match and write a level-1 record.
    pub pre_match_wcs: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            reference_wavelength: DEFAULT_REFERENCE_WAVELENGTH,
            rotation_rate_deg_per_min: DEFAULT_ROTATION_RATE_DEG_PER_MIN,
            fill: DEFAULT_FILL,
            save: true,
            output_dir: None,
            name: None,
            pre_match_wcs: false,
        }
    }
}

impl AlignConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn record_level(&self) -> RecordLevel {
        if self.pre_match_wcs {
            RecordLevel::Level1
        } else {
            RecordLevel::Level0
        }
    }
}
