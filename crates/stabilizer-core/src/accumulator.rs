//! Trajectory accumulation.

use stabkit_motion_model::{MotionSample, Trajectory};

/// Advance `trajectory` by one frame's motion.
///
/// Angles are summed as-is; no wrap-around normalization is applied.
pub fn accumulate(trajectory: Trajectory, sample: MotionSample) -> Trajectory {
    Trajectory {
        x: trajectory.x + sample.dx,
        y: trajectory.y + sample.dy,
        a: trajectory.a + sample.da,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accumulate_from_origin() {
        let t = accumulate(Trajectory::ORIGIN, MotionSample::new(1.5, -2.0, 0.1));
        assert_eq!(t, Trajectory::new(1.5, -2.0, 0.1));
    }

    #[test]
    fn test_angle_is_not_wrapped() {
        let step = MotionSample::new(0.0, 0.0, 1.0);
        let t = (0..10).fold(Trajectory::ORIGIN, |t, _| accumulate(t, step));
        assert!((t.a - 10.0).abs() < 1e-12);
        assert!(t.a > std::f64::consts::TAU);
    }

    proptest! {
        #[test]
        fn prop_trajectory_is_sum_of_samples(
            samples in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -0.5f64..0.5), 1..64)
        ) {
            let mut t = Trajectory::ORIGIN;
            let (mut sx, mut sy, mut sa) = (0.0, 0.0, 0.0);
            for &(dx, dy, da) in &samples {
                t = accumulate(t, MotionSample::new(dx, dy, da));
                sx += dx;
                sy += dy;
                sa += da;
            }
            // Same left-to-right summation order, so exact.
            prop_assert_eq!(t, Trajectory::new(sx, sy, sa));
        }
    }
}
