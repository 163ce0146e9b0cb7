use ndarray::{Array2, ArrayBase, ArrayView2, Axis, Data, Dimension, Ix2, Ix3, IxDyn};
use num_complex::Complex;
use num_traits::AsPrimitive;
use rayon::prelude::*;

use crate::consts::PARALLEL_PLANE_THRESHOLD;
use crate::error::{CoalignError, Result};
use crate::frame::{Offset, OffsetEstimate, OffsetSeries};

use super::fft::Fft2dPlan;
use super::subpixel::{find_abs_peak, refine_peak_parabolic, wrap_index};
use super::window::apodization_window;

/// Estimate the offset of `image` relative to `template` by windowed FFT
/// cross-correlation with parabolic sub-pixel refinement.
///
/// Both arrays are coerced to `f64` working copies; neither is modified.
pub fn estimate_offset<A, B, S1, S2>(
    image: &ArrayBase<S1, Ix2>,
    template: &ArrayBase<S2, Ix2>,
) -> Result<Offset>
where
    A: AsPrimitive<f64>,
    B: AsPrimitive<f64>,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
{
    check_spatial_shape(image.dim(), template.dim())?;
    let prepared = PreparedTemplate::new(&to_f64(template))?;
    prepared.plane_offset(to_f64(image).view())
}

/// Estimate one offset per plane of a `[plane, y, x]` stack against a single
/// template. Each plane gets its own mean removed; planes are independent.
pub fn estimate_offset_stack<A, B, S1, S2>(
    stack: &ArrayBase<S1, Ix3>,
    template: &ArrayBase<S2, Ix2>,
) -> Result<OffsetSeries>
where
    A: AsPrimitive<f64>,
    B: AsPrimitive<f64>,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
{
    let (planes, h, w) = stack.dim();
    check_spatial_shape((h, w), template.dim())?;
    let prepared = PreparedTemplate::new(&to_f64(template))?;
    let stack = to_f64(stack);

    let offsets: Vec<Offset> = if planes >= PARALLEL_PLANE_THRESHOLD {
        (0..planes)
            .into_par_iter()
            .map(|i| prepared.plane_offset(stack.index_axis(Axis(0), i)))
            .collect::<Result<_>>()?
    } else {
        stack
            .outer_iter()
            .map(|plane| prepared.plane_offset(plane))
            .collect::<Result<_>>()?
    };

    Ok(offsets.into_iter().collect())
}

/// Rank-dispatching estimation over dynamic-dimensional arrays.
///
/// A 2D image yields [`OffsetEstimate::Single`], a 3D stack
/// [`OffsetEstimate::Stack`]. Any other image rank, or a template that is not
/// 2D, is a [`CoalignError::Dimensionality`] error.
pub fn estimate_offset_dyn<A, B, S1, S2>(
    image: &ArrayBase<S1, IxDyn>,
    template: &ArrayBase<S2, IxDyn>,
) -> Result<OffsetEstimate>
where
    A: AsPrimitive<f64>,
    B: AsPrimitive<f64>,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
{
    let rank = image.ndim();
    if rank != 2 && rank != 3 {
        return Err(CoalignError::Dimensionality {
            what: "image",
            expected: "2 or 3 dimensional",
            rank,
        });
    }
    let template = template
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| CoalignError::Dimensionality {
            what: "template",
            expected: "2 dimensional",
            rank: template.ndim(),
        })?;

    let image = image.view();
    if rank == 2 {
        let image = image
            .into_dimensionality::<Ix2>()
            .map_err(|_| CoalignError::Dimensionality {
                what: "image",
                expected: "2 dimensional",
                rank,
            })?;
        estimate_offset(&image, &template).map(OffsetEstimate::Single)
    } else {
        let stack = image
            .into_dimensionality::<Ix3>()
            .map_err(|_| CoalignError::Dimensionality {
                what: "image",
                expected: "3 dimensional",
                rank,
            })?;
        estimate_offset_stack(&stack, &template).map(OffsetEstimate::Stack)
    }
}

/// Cross-correlation surface of a windowed, mean-removed image against a
/// windowed, mean-removed template. The peak sits at the image's displacement
/// relative to the template, circularly wrapped.
pub fn correlation_surface<A, B, S1, S2>(
    image: &ArrayBase<S1, Ix2>,
    template: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f64>>
where
    A: AsPrimitive<f64>,
    B: AsPrimitive<f64>,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
{
    check_spatial_shape(image.dim(), template.dim())?;
    let prepared = PreparedTemplate::new(&to_f64(template))?;
    Ok(prepared.correlate(to_f64(image).view()))
}

/// Template-side state shared by every plane compared against it.
struct PreparedTemplate {
    plan: Fft2dPlan,
    window: Array2<f64>,
    spectrum_conj: Array2<Complex<f64>>,
}

impl PreparedTemplate {
    fn new(template: &Array2<f64>) -> Result<Self> {
        let (h, w) = template.dim();
        if h == 0 || w == 0 {
            return Err(CoalignError::Dimensionality {
                what: "template",
                expected: "non-empty 2 dimensional",
                rank: 2,
            });
        }

        let plan = Fft2dPlan::new(h, w);
        let window = apodization_window(h, w);
        let mean = template.mean().unwrap_or(0.0);
        let windowed = (template - mean) * &window;
        let spectrum_conj = plan.forward(&windowed).mapv(|c| c.conj());

        Ok(Self {
            plan,
            window,
            spectrum_conj,
        })
    }

    fn correlate(&self, plane: ArrayView2<'_, f64>) -> Array2<f64> {
        let mean = plane.mean().unwrap_or(0.0);
        let windowed = (&plane - mean) * &self.window;
        let spectrum = self.plan.forward(&windowed) * &self.spectrum_conj;
        self.plan.inverse_real(&spectrum)
    }

    fn plane_offset(&self, plane: ArrayView2<'_, f64>) -> Result<Offset> {
        let correlation = self.correlate(plane);
        let (h, w) = correlation.dim();

        let (peak_row, peak_col) = find_abs_peak(&correlation);
        let y0 = wrap_index(peak_row, h) as f64;
        let x0 = wrap_index(peak_col, w) as f64;

        let (sub_y, sub_x) = refine_peak_parabolic(&correlation, peak_row, peak_col)?;

        Ok(Offset::new(x0 + sub_x, y0 + sub_y))
    }
}

fn check_spatial_shape(image: (usize, usize), template: (usize, usize)) -> Result<()> {
    if image != template {
        return Err(CoalignError::ShapeMismatch {
            image_h: image.0,
            image_w: image.1,
            template_h: template.0,
            template_w: template.1,
        });
    }
    Ok(())
}

fn to_f64<A, S, D>(data: &ArrayBase<S, D>) -> ndarray::Array<f64, D>
where
    A: AsPrimitive<f64>,
    S: Data<Elem = A>,
    D: Dimension,
{
    data.mapv(|v| v.as_())
}
