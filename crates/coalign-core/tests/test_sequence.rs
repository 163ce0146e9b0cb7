mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use coalign_core::align::{CorrelationEstimator, ShiftEstimator};
use coalign_core::error::{CoalignError, Result};
use coalign_core::frame::{CoordinateGrid, CropGeometry, Offset};
use coalign_core::sequence::SequentialAligner;

use common::scene_frame;

/// Central 64x64 crop of a 128x128 frame, rotating about (64, 64).
fn geometry() -> CropGeometry {
    CropGeometry::from_dims(128, 128)
}

fn frame(angle: f64, translation: (f64, f64)) -> Array2<f64> {
    let g = geometry();
    scene_frame(
        g.bounds.height(),
        g.bounds.width(),
        (g.bounds.x1 as f64, g.bounds.y1 as f64),
        g.center(),
        angle,
        translation,
    )
}

/// Counts calls and delegates to the correlation estimator.
#[derive(Default)]
struct CountingEstimator {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl ShiftEstimator for CountingEstimator {
    fn estimate(&self, image: &Array2<f64>, template: &Array2<f64>) -> Result<Offset> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(CoalignError::DegeneratePeak { row: 0, col: 0 });
        }
        CorrelationEstimator.estimate(image, template)
    }

    fn name(&self) -> &str {
        "Counting"
    }
}

#[test]
fn test_geometry_is_central_half() {
    let g = geometry();
    assert_eq!((g.xc, g.yc), (64, 64));
    assert_eq!((g.bounds.x1, g.bounds.x2), (32, 96));
    assert_eq!((g.bounds.y1, g.bounds.y2), (32, 96));
    assert_eq!(g.grid.x[0], 32.0);
    assert_eq!(g.grid.width(), 64);

    let aligner = SequentialAligner::from_geometry(&g);
    assert_eq!(aligner.grid(), &g.grid);
}

#[test]
fn test_geometry_crop_is_even() {
    let g = CropGeometry::from_dims(130, 101);
    // nx1 = ((130 / 2) / 2) * 2 = 64, ny1 = ((101 / 2) / 2) * 2 = 50
    assert_eq!(g.bounds.width(), 64);
    assert_eq!(g.bounds.height(), 50);
    assert_eq!((g.xc, g.yc), (65, 50));
    assert_eq!(g.bounds.x1, 33);
    assert_eq!(g.bounds.y1, 25);
}

#[test]
fn test_single_frame_needs_no_estimation() {
    let counter = Arc::new(CountingEstimator::default());
    let aligner = SequentialAligner::from_geometry(&geometry()).with_estimator(counter.clone());

    let trajectory = aligner.build_trajectory(&[frame(0.0, (0.0, 0.0))], &[0.0]).unwrap();
    assert_eq!(trajectory.dx, vec![0.0]);
    assert_eq!(trajectory.dy, vec![0.0]);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_sequence_is_rejected() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let err = aligner.build_trajectory(&[], &[]).unwrap_err();
    assert!(matches!(err, CoalignError::EmptySequence));
}

#[test]
fn test_angle_count_must_match_frames() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let frames = vec![frame(0.0, (0.0, 0.0)); 3];
    let err = aligner.build_trajectory(&frames, &[0.0, 0.0]).unwrap_err();
    assert!(matches!(err, CoalignError::LengthMismatch { frames: 3, angles: 2 }));
}

#[test]
fn test_identical_frames_give_zero_trajectory() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let frames = vec![frame(0.0, (0.0, 0.0)); 5];

    let trajectory = aligner.build_trajectory(&frames, &[0.0; 5]).unwrap();
    assert_eq!(trajectory.len(), 5);
    for i in 0..5 {
        assert_abs_diff_eq!(trajectory.dx[i], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(trajectory.dy[i], 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_two_estimates_per_step() {
    let counter = Arc::new(CountingEstimator::default());
    let aligner = SequentialAligner::from_geometry(&geometry()).with_estimator(counter.clone());
    let frames = vec![frame(0.0, (0.0, 0.0)); 4];

    aligner.build_trajectory(&frames, &[0.0; 4]).unwrap();
    assert_eq!(counter.calls.load(Ordering::SeqCst), 6);
}

#[test]
fn test_translational_drift_is_accumulated() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let step = (1.5, -0.8);
    let frames: Vec<_> = (0..5)
        .map(|i| frame(0.0, (step.0 * i as f64, step.1 * i as f64)))
        .collect();

    let trajectory = aligner.build_trajectory(&frames, &[0.0; 5]).unwrap();
    assert_eq!(trajectory.dx[0], 0.0);
    assert_eq!(trajectory.dy[0], 0.0);
    for i in 1..5 {
        let offset = trajectory.offset(i).unwrap();
        assert_abs_diff_eq!(offset.x, step.0 * i as f64, epsilon = 0.3);
        assert_abs_diff_eq!(offset.y, step.1 * i as f64, epsilon = 0.3);
    }
    assert!(trajectory.offset(5).is_none());
}

#[test]
fn test_rotation_is_compensated() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let angles: Vec<f64> = (0..4).map(|i| 0.02 * i as f64).collect();
    let frames: Vec<_> = angles.iter().map(|&a| frame(a, (0.0, 0.0))).collect();

    let trajectory = aligner.build_trajectory(&frames, &angles).unwrap();
    for i in 0..4 {
        assert_abs_diff_eq!(trajectory.dx[i], 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(trajectory.dy[i], 0.0, epsilon = 0.1);
    }
}

#[test]
fn test_rotation_and_translation_together() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let angles: Vec<f64> = (0..4).map(|i| 0.01 * i as f64).collect();
    let frames: Vec<_> = angles
        .iter()
        .enumerate()
        .map(|(i, &a)| frame(a, (-1.0 * i as f64, 0.75 * i as f64)))
        .collect();

    let trajectory = aligner.build_trajectory(&frames, &angles).unwrap();
    for i in 1..4 {
        assert_abs_diff_eq!(trajectory.dx[i], -1.0 * i as f64, epsilon = 0.3);
        assert_abs_diff_eq!(trajectory.dy[i], 0.75 * i as f64, epsilon = 0.3);
    }
}

#[test]
fn test_streaming_fetches_each_frame_once_in_order() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let base = frame(0.0, (0.0, 0.0));
    let mut fetched = Vec::new();
    let mut progress = Vec::new();

    let trajectory = aligner
        .build_trajectory_streaming(
            &[0.0; 4],
            |i| {
                fetched.push(i);
                Ok(base.clone())
            },
            |done| progress.push(done),
            None,
        )
        .unwrap();

    assert_eq!(trajectory.len(), 4);
    assert_eq!(fetched, vec![0, 1, 2, 3]);
    assert_eq!(progress, vec![1, 2, 3]);
}

#[test]
fn test_cancel_before_first_step() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let frames = vec![frame(0.0, (0.0, 0.0)); 3];
    let cancel = AtomicBool::new(true);

    let err = aligner
        .build_trajectory_streaming(&[0.0; 3], |i| Ok(&frames[i]), |_| {}, Some(&cancel))
        .unwrap_err();
    assert!(matches!(err, CoalignError::Cancelled { completed: 0, total: 2 }));
}

#[test]
fn test_cancel_at_step_boundary() {
    let aligner = SequentialAligner::from_geometry(&geometry());
    let frames = vec![frame(0.0, (0.0, 0.0)); 4];
    let cancel = AtomicBool::new(false);

    let err = aligner
        .build_trajectory_streaming(
            &[0.0; 4],
            |i| Ok(&frames[i]),
            |done| {
                if done == 1 {
                    cancel.store(true, Ordering::Relaxed);
                }
            },
            Some(&cancel),
        )
        .unwrap_err();
    assert!(matches!(err, CoalignError::Cancelled { completed: 1, total: 3 }));
}

#[test]
fn test_estimator_failure_aborts_build() {
    let failing = Arc::new(CountingEstimator {
        calls: AtomicUsize::new(0),
        fail_on_call: Some(3),
    });
    let aligner = SequentialAligner::from_geometry(&geometry()).with_estimator(failing.clone());
    let frames = vec![frame(0.0, (0.0, 0.0)); 4];

    let err = aligner.build_trajectory(&frames, &[0.0; 4]).unwrap_err();
    assert!(matches!(err, CoalignError::DegeneratePeak { .. }));
    assert_eq!(failing.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_frames_off_grid_are_rejected() {
    let aligner = SequentialAligner::new(CoordinateGrid::for_shape(32, 32), (16.0, 16.0));
    let frames = vec![Array2::<f64>::zeros((16, 16)); 2];
    let err = aligner.build_trajectory(&frames, &[0.0, 0.0]).unwrap_err();
    assert!(matches!(err, CoalignError::ShapeMismatch { .. }));
}
