use ndarray::Array2;
use tracing::debug;

use crate::error::Result;
use crate::frame::Offset;

use super::aligner::SequentialAligner;

/// The two estimation passes of one frame-to-frame step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPass {
    /// Both frames de-rotated in place, no translation applied.
    Local,
    /// Both frames de-rotated and moved into the running cumulative frame.
    Reference,
}

/// Inputs of the step between frame `i` and frame `i + 1`.
pub(crate) struct StepInput<'a> {
    pub index: usize,
    pub previous: &'a Array2<f64>,
    pub next: &'a Array2<f64>,
    pub previous_angle: f64,
    pub next_angle: f64,
    /// Cumulative offset of frame `i` relative to frame 0.
    pub cumulative: Offset,
}

impl SequentialAligner {
    /// Shift of frame `i + 1` relative to frame `i`, as the sum of the local
    /// estimate and the residual left after re-anchoring both frames on the
    /// cumulative trajectory.
    pub(crate) fn run_step(&self, input: &StepInput<'_>) -> Result<Offset> {
        let mut pass = StepPass::Local;
        let mut shift = Offset::default();

        loop {
            match pass {
                StepPass::Local => {
                    let reference =
                        self.derotate(input.previous, input.previous_angle, Offset::default())?;
                    let moved =
                        self.derotate(input.next, input.next_angle, Offset::default())?;
                    shift = self.estimator().estimate(&moved, &reference)?;
                    debug!(step = input.index, dx = shift.x, dy = shift.y, "Local pass");
                    pass = StepPass::Reference;
                }
                StepPass::Reference => {
                    let reference =
                        self.derotate(input.previous, input.previous_angle, input.cumulative)?;
                    let moved =
                        self.derotate(input.next, input.next_angle, input.cumulative + shift)?;
                    let residual = self.estimator().estimate(&moved, &reference)?;
                    debug!(
                        step = input.index,
                        dx = residual.x,
                        dy = residual.y,
                        "Reference pass"
                    );
                    return Ok(shift + residual);
                }
            }
        }
    }
}
