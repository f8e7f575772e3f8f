//! Motion samples, trajectories, and corrective transforms.
//!
//! A [`MotionSample`] is the frame-to-frame rigid motion reported by an
//! estimator. Summing samples gives the cumulative [`Trajectory`]. The
//! [`CorrectiveTransform`] is the motion the warper applies so the output
//! follows the smoothed trajectory instead of the raw one.
//!
//! The three axes never interact: every operation here is per-axis.

use serde::{Deserialize, Serialize};

use crate::affine::RigidAffine;

/// One of the three independent trajectory axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal translation (pixels).
    X,
    /// Vertical translation (pixels).
    Y,
    /// Rotation (radians).
    Angle,
}

impl Axis {
    /// All axes, in processing order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Angle];

    /// Short name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Angle => "a",
        }
    }
}

/// Raw frame-to-frame rigid motion of the current frame relative to the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    /// Horizontal translation in pixels.
    pub dx: f64,
    /// Vertical translation in pixels.
    pub dy: f64,
    /// Rotation in radians.
    pub da: f64,
}

impl MotionSample {
    /// No motion.
    pub const ZERO: MotionSample = MotionSample {
        dx: 0.0,
        dy: 0.0,
        da: 0.0,
    };

    pub fn new(dx: f64, dy: f64, da: f64) -> Self {
        Self { dx, dy, da }
    }

    /// Pure translation.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self { dx, dy, da: 0.0 }
    }

    /// The component along `axis`.
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Angle => self.da,
        }
    }

    /// Build a sample by evaluating `f` once per axis.
    pub fn from_axes(mut f: impl FnMut(Axis) -> f64) -> Self {
        Self {
            dx: f(Axis::X),
            dy: f(Axis::Y),
            da: f(Axis::Angle),
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.da.is_finite()
    }
}

/// Cumulative camera pose: the running sum of all motion samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    /// Accumulated horizontal position (pixels).
    pub x: f64,
    /// Accumulated vertical position (pixels).
    pub y: f64,
    /// Accumulated heading (radians, unwrapped).
    pub a: f64,
}

impl Trajectory {
    /// The pose before any motion has been observed.
    pub const ORIGIN: Trajectory = Trajectory {
        x: 0.0,
        y: 0.0,
        a: 0.0,
    };

    pub fn new(x: f64, y: f64, a: f64) -> Self {
        Self { x, y, a }
    }

    /// The component along `axis`.
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Angle => self.a,
        }
    }

    /// Build a trajectory by evaluating `f` once per axis.
    pub fn from_axes(mut f: impl FnMut(Axis) -> f64) -> Self {
        Self {
            x: f(Axis::X),
            y: f(Axis::Y),
            a: f(Axis::Angle),
        }
    }
}

/// The motion to apply to the raw frame so the output follows the
/// smoothed trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectiveTransform {
    /// Horizontal translation in pixels.
    pub dx: f64,
    /// Vertical translation in pixels.
    pub dy: f64,
    /// Rotation in radians.
    pub da: f64,
}

impl CorrectiveTransform {
    /// The identity correction.
    pub const IDENTITY: CorrectiveTransform = CorrectiveTransform {
        dx: 0.0,
        dy: 0.0,
        da: 0.0,
    };

    pub fn new(dx: f64, dy: f64, da: f64) -> Self {
        Self { dx, dy, da }
    }

    /// The component along `axis`.
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Angle => self.da,
        }
    }

    /// Reinterpret this correction as a raw motion sample.
    ///
    /// Used as the stand-in sample when the estimator fails.
    pub fn as_sample(&self) -> MotionSample {
        MotionSample::new(self.dx, self.dy, self.da)
    }

    /// The 2×3 rigid matrix a warper applies for this correction.
    pub fn to_affine(&self) -> RigidAffine {
        RigidAffine::from_motion(self.dx, self.dy, self.da)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_matches_fields() {
        let s = MotionSample::new(1.0, 2.0, 0.5);
        assert_eq!(s.component(Axis::X), 1.0);
        assert_eq!(s.component(Axis::Y), 2.0);
        assert_eq!(s.component(Axis::Angle), 0.5);

        let t = Trajectory::new(-3.0, 4.0, 0.1);
        assert_eq!(Trajectory::from_axes(|axis| t.component(axis)), t);
    }

    #[test]
    fn test_from_axes_visits_in_order() {
        let mut seen = Vec::new();
        MotionSample::from_axes(|axis| {
            seen.push(axis);
            0.0
        });
        assert_eq!(seen, Axis::ALL.to_vec());
    }

    #[test]
    fn test_correction_as_sample() {
        let c = CorrectiveTransform::new(0.5, -0.25, 0.01);
        assert_eq!(c.as_sample(), MotionSample::new(0.5, -0.25, 0.01));
    }

    #[test]
    fn test_non_finite_sample_detected() {
        assert!(MotionSample::translation(1.0, 2.0).is_finite());
        assert!(!MotionSample::new(f64::NAN, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&Trajectory::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"a":3.0}"#);
    }
}
