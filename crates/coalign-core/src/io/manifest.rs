use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoalignError, Result};
use crate::frame::{FrameHeader, RasterBounds};

use super::image_io::{crop_raster, load_raster, raster_dimensions};
use super::source::{FrameSource, HeaderSource};

/// One entry of a frame manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Frame identifier; defaults to the path as written.
    #[serde(default)]
    pub id: Option<String>,
    pub path: PathBuf,
    /// Acquisition time, RFC 3339 or `YYYY-MM-DDTHH:MM:SS[.fff]` in UTC.
    pub timestamp: String,
}

/// An ordered list of single-band raster image files with acquisition times.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameManifest {
    #[serde(default)]
    pub frames: Vec<ManifestEntry>,
}

impl FrameManifest {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

struct ResolvedFrame {
    path: PathBuf,
    timestamp: DateTime<Utc>,
}

/// Frame and header source over a [`FrameManifest`].
///
/// Each image is a raster already extracted at one wavelength; the wavelength
/// passed to [`FrameSource::raster`] is only logged.
pub struct ImageFrameSet {
    ids: Vec<String>,
    frames: HashMap<String, ResolvedFrame>,
}

impl ImageFrameSet {
    /// Load a manifest file; relative image paths resolve against its directory.
    pub fn open(manifest_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(manifest_path)?;
        let manifest = FrameManifest::from_toml_str(&contents)?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_manifest(manifest, base)
    }

    pub fn from_manifest(manifest: FrameManifest, base_dir: &Path) -> Result<Self> {
        let mut ids = Vec::with_capacity(manifest.frames.len());
        let mut frames = HashMap::with_capacity(manifest.frames.len());

        for entry in manifest.frames {
            let id = entry
                .id
                .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());
            let path = if entry.path.is_absolute() {
                entry.path
            } else {
                base_dir.join(entry.path)
            };
            let timestamp = parse_timestamp(&entry.timestamp)?;
            if frames
                .insert(id.clone(), ResolvedFrame { path, timestamp })
                .is_some()
            {
                return Err(CoalignError::FrameSource(format!(
                    "duplicate frame id {id:?} in manifest"
                )));
            }
            ids.push(id);
        }

        Ok(Self { ids, frames })
    }

    /// Frame identifiers in manifest order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    fn resolve(&self, id: &str) -> Result<&ResolvedFrame> {
        self.frames
            .get(id)
            .ok_or_else(|| CoalignError::FrameSource(format!("unknown frame id {id:?}")))
    }
}

impl HeaderSource for ImageFrameSet {
    fn header(&self, id: &str) -> Result<FrameHeader> {
        let frame = self.resolve(id)?;
        let (nx, ny) = raster_dimensions(&frame.path)?;
        Ok(FrameHeader {
            timestamp: frame.timestamp,
            nx,
            ny,
            nwave: 1,
        })
    }
}

impl FrameSource for ImageFrameSet {
    fn raster(&self, id: &str, wavelength: f64, bounds: RasterBounds) -> Result<Array2<f64>> {
        let frame = self.resolve(id)?;
        debug!(id, wavelength, path = %frame.path.display(), "Loading raster");
        crop_raster(&load_raster(&frame.path)?, bounds)
    }
}

/// Parse an acquisition time. Strings without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(|e| CoalignError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
