//! Corrective transform synthesis.
//!
//! The correction is the raw frame motion plus the offset between the
//! smoothed and raw trajectories. Warping the frame by it leaves the output
//! at the smoothed pose instead of the raw one.

use stabkit_motion_model::{Axis, CorrectiveTransform, MotionSample, Trajectory};

/// Per-axis offset `smoothed - raw`.
pub fn trajectory_offset(raw: &Trajectory, smoothed: &Trajectory) -> MotionSample {
    MotionSample::from_axes(|axis| smoothed.component(axis) - raw.component(axis))
}

/// Fold the smoothed-vs-raw offset into this frame's raw motion.
pub fn synthesize(
    raw: &Trajectory,
    smoothed: &Trajectory,
    sample: &MotionSample,
) -> CorrectiveTransform {
    let offset = trajectory_offset(raw, smoothed);
    let corrected = |axis: Axis| sample.component(axis) + offset.component(axis);
    CorrectiveTransform::new(
        corrected(Axis::X),
        corrected(Axis::Y),
        corrected(Axis::Angle),
    )
}
