use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use tracing::info;

use crate::error::{CoalignError, Result};
use crate::frame::{CropGeometry, FrameHeader};
use crate::io::{FrameSource, HeaderSource, TrajectoryStore};
use crate::record::AlignmentRecord;
use crate::sequence::SequentialAligner;

use super::config::AlignConfig;

/// Outcome of [`align_sequence`].
#[derive(Clone, Debug)]
pub struct AlignmentOutput {
    pub record: AlignmentRecord,
    /// Base name the record was (or would be) saved under.
    pub base_name: String,
    /// Where the record was written, when saving was enabled.
    pub saved: Option<PathBuf>,
}

/// Minutes elapsed since the first header's timestamp, per frame.
pub fn elapsed_minutes(headers: &[FrameHeader]) -> Vec<f64> {
    let Some(first) = headers.first() else {
        return Vec::new();
    };
    headers
        .iter()
        .map(|h| (h.timestamp - first.timestamp).num_milliseconds() as f64 / 60_000.0)
        .collect()
}

/// Rotation angle in radians for each time offset at `rate_deg_per_min`.
pub fn rotation_angles(dt_minutes: &[f64], rate_deg_per_min: f64) -> Vec<f64> {
    dt_minutes
        .iter()
        .map(|dt| (dt * rate_deg_per_min).to_radians())
        .collect()
}

/// Co-align an ordered frame sequence and optionally persist the record.
///
/// The first frame is the reference. Rasters are the central half of each
/// frame, fetched one step at a time; `on_step_done` receives the number of
/// completed steps (out of `ids.len() - 1`).
pub fn align_sequence<I, P>(
    ids: &[I],
    headers: &dyn HeaderSource,
    frames: &dyn FrameSource,
    store: &dyn TrajectoryStore,
    config: &AlignConfig,
    on_step_done: P,
    cancel: Option<&AtomicBool>,
) -> Result<AlignmentOutput>
where
    I: AsRef<str>,
    P: FnMut(usize),
{
    if ids.is_empty() {
        return Err(CoalignError::EmptySequence);
    }

    let frame_headers = ids
        .iter()
        .map(|id| headers.header(id.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let first = &frame_headers[0];

    let dt = elapsed_minutes(&frame_headers);
    let angles = rotation_angles(&dt, config.rotation_rate_deg_per_min);
    let geometry = CropGeometry::from_header(first);
    info!(
        frames = ids.len(),
        nx = first.nx,
        ny = first.ny,
        crop_width = geometry.bounds.width(),
        crop_height = geometry.bounds.height(),
        span_minutes = dt.last().copied().unwrap_or(0.0),
        "Starting sequence alignment"
    );

    let aligner = SequentialAligner::from_geometry(&geometry).with_fill(config.fill);
    let trajectory = aligner.build_trajectory_streaming(
        &angles,
        |i| frames.raster(ids[i].as_ref(), config.reference_wavelength, geometry.bounds),
        on_step_done,
        cancel,
    )?;

    let record = AlignmentRecord::new(geometry.center(), angles, dt, trajectory);
    let base_name = config
        .name
        .clone()
        .unwrap_or_else(|| first.timestamp.format("%Y-%m-%d").to_string());

    let saved = if config.save {
        Some(store.save(&base_name, &record, config.record_level())?)
    } else {
        None
    };

    Ok(AlignmentOutput {
        record,
        base_name,
        saved,
    })
}
