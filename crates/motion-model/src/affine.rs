//! 2×3 rigid affine matrices.
//!
//! Estimators report motion as a matrix and warpers consume one. The
//! layout is row-major:
//!
//! ```text
//! | cos(a)  -sin(a)  dx |
//! | sin(a)   cos(a)  dy |
//! ```

use serde::{Deserialize, Serialize};

use crate::motion::MotionSample;

/// A 2×3 affine matrix restricted (by convention) to rotation and translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidAffine {
    /// Row-major matrix entries.
    pub m: [[f64; 3]; 2],
}

impl RigidAffine {
    /// The identity transform.
    pub const IDENTITY: RigidAffine = RigidAffine {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Build the rigid matrix for a translation `(dx, dy)` and rotation `da`.
    pub fn from_motion(dx: f64, dy: f64, da: f64) -> Self {
        let (sin, cos) = da.sin_cos();
        Self {
            m: [[cos, -sin, dx], [sin, cos, dy]],
        }
    }

    /// Wrap an estimated matrix as-is.
    ///
    /// Estimators may return a matrix with a small scale component; it is
    /// discarded by [`RigidAffine::decompose`].
    pub fn from_rows(m: [[f64; 3]; 2]) -> Self {
        Self { m }
    }

    /// Extract translation and rotation.
    ///
    /// The angle is read from the first column only, so any residual scale
    /// or shear is ignored.
    pub fn decompose(&self) -> MotionSample {
        MotionSample {
            dx: self.m[0][2],
            dy: self.m[1][2],
            da: self.m[1][0].atan2(self.m[0][0]),
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        )
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for RigidAffine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
