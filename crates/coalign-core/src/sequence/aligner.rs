use std::borrow::Borrow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use tracing::info;

use crate::align::{CorrelationEstimator, ShiftEstimator};
use crate::consts::DEFAULT_FILL;
use crate::error::{CoalignError, Result};
use crate::frame::{CoordinateGrid, CropGeometry, Offset, Trajectory};
use crate::rotate::{BilinearRotation, RotationTransform};

use super::step::StepInput;

/// Builds a cumulative displacement trajectory over an ordered frame sequence.
///
/// Each step compares consecutive frames (never a late frame against frame 0),
/// so structural evolution of the scene does not degrade the comparison, while
/// the running sum keeps every offset relative to frame 0. Per-step estimation
/// noise accumulates along the sequence; this drift is not bounded or
/// detected.
pub struct SequentialAligner {
    estimator: Arc<dyn ShiftEstimator>,
    rotation: Arc<dyn RotationTransform>,
    grid: CoordinateGrid,
    center: (f64, f64),
    fill: f64,
}

impl SequentialAligner {
    /// Aligner for frames laid out on `grid`, rotating about `center`.
    pub fn new(grid: CoordinateGrid, center: (f64, f64)) -> Self {
        Self {
            estimator: Arc::new(CorrelationEstimator),
            rotation: Arc::new(BilinearRotation),
            grid,
            center,
            fill: DEFAULT_FILL,
        }
    }

    /// Aligner for central crops described by `geometry`.
    pub fn from_geometry(geometry: &CropGeometry) -> Self {
        Self::new(geometry.grid.clone(), geometry.center())
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn ShiftEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_rotation(mut self, rotation: Arc<dyn RotationTransform>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_fill(mut self, fill: f64) -> Self {
        self.fill = fill;
        self
    }

    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    pub(crate) fn estimator(&self) -> &dyn ShiftEstimator {
        self.estimator.as_ref()
    }

    pub(crate) fn derotate(
        &self,
        frame: &Array2<f64>,
        angle: f64,
        shift: Offset,
    ) -> Result<Array2<f64>> {
        self.rotation
            .rotate(frame, angle, &self.grid, self.center, shift, self.fill)
    }

    /// Trajectory of in-memory `frames` with one rotation angle (radians) each.
    pub fn build_trajectory(&self, frames: &[Array2<f64>], angles: &[f64]) -> Result<Trajectory> {
        if frames.len() != angles.len() {
            return Err(CoalignError::LengthMismatch {
                frames: frames.len(),
                angles: angles.len(),
            });
        }
        self.build_trajectory_streaming(angles, |i| Ok(&frames[i]), |_| {}, None)
    }

    /// Trajectory of `angles.len()` frames fetched one at a time.
    ///
    /// `fetch(i)` is called once per frame, in order, at step boundaries.
    /// `on_step_done` receives the number of completed steps. `cancel` is
    /// polled before each step; once set, the build stops with
    /// [`CoalignError::Cancelled`] and no partial trajectory is returned.
    pub fn build_trajectory_streaming<F, B, P>(
        &self,
        angles: &[f64],
        mut fetch: F,
        mut on_step_done: P,
        cancel: Option<&AtomicBool>,
    ) -> Result<Trajectory>
    where
        F: FnMut(usize) -> Result<B>,
        B: Borrow<Array2<f64>>,
        P: FnMut(usize),
    {
        let n = angles.len();
        if n == 0 {
            return Err(CoalignError::EmptySequence);
        }

        let steps = n - 1;
        info!(
            frames = n,
            estimator = self.estimator.name(),
            "Building alignment trajectory"
        );

        let mut dx = vec![0.0; n];
        let mut dy = vec![0.0; n];
        if steps == 0 {
            return Ok(Trajectory { dx, dy });
        }

        let mut previous = fetch(0)?;
        for i in 0..steps {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(CoalignError::Cancelled {
                    completed: i,
                    total: steps,
                });
            }

            let next = fetch(i + 1)?;
            let shift = self.run_step(&StepInput {
                index: i,
                previous: previous.borrow(),
                next: next.borrow(),
                previous_angle: angles[i],
                next_angle: angles[i + 1],
                cumulative: Offset::new(dx[i], dy[i]),
            })?;

            dx[i + 1] = dx[i] + shift.x;
            dy[i + 1] = dy[i] + shift.y;
            previous = next;
            on_step_done(i + 1);
        }

        info!(
            frames = n,
            final_dx = dx[steps],
            final_dy = dy[steps],
            "Alignment trajectory complete"
        );
        Ok(Trajectory { dx, dy })
    }
}
