//! Per-axis recursive trajectory smoothing.
//!
//! Each axis runs a scalar Kalman filter with identity dynamics: the true
//! trajectory value is assumed constant between frames apart from injected
//! process noise. The ratio `process_variance / measurement_variance` sets
//! the low-pass cutoff; smaller ratios smooth harder and lag intentional
//! camera moves more.

use serde::{Deserialize, Serialize};
use stabkit_common::{StabilizationDefaults, StabkitError, StabkitResult};
use stabkit_motion_model::{Axis, Trajectory};

/// Noise model shared by all three axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseParameters {
    process_variance: f64,
    measurement_variance: f64,
}

impl NoiseParameters {
    /// Create a noise model. Both variances must be finite and > 0.
    pub fn new(process_variance: f64, measurement_variance: f64) -> StabkitResult<Self> {
        StabilizationDefaults {
            process_variance,
            measurement_variance,
            ..Default::default()
        }
        .validate()?;
        Ok(Self {
            process_variance,
            measurement_variance,
        })
    }

    /// Noise model from the configured stabilization defaults.
    pub fn from_config(config: &StabilizationDefaults) -> StabkitResult<Self> {
        Self::new(config.process_variance, config.measurement_variance)
    }

    pub fn process_variance(&self) -> f64 {
        self.process_variance
    }

    pub fn measurement_variance(&self) -> f64 {
        self.measurement_variance
    }

    /// Posterior error variance the recursion settles at.
    ///
    /// Positive root of `P² + qP - qr = 0`, the fixed point of
    /// `P = r(P + q) / (P + q + r)`.
    pub fn steady_state_variance(&self) -> f64 {
        let q = self.process_variance;
        let r = self.measurement_variance;
        (-q + (q * q + 4.0 * q * r).sqrt()) / 2.0
    }

    /// Gain the recursion settles at.
    pub fn steady_state_gain(&self) -> f64 {
        let prior = self.steady_state_variance() + self.process_variance;
        prior / (prior + self.measurement_variance)
    }
}

impl Default for NoiseParameters {
    fn default() -> Self {
        let defaults = StabilizationDefaults::default();
        Self {
            process_variance: defaults.process_variance,
            measurement_variance: defaults.measurement_variance,
        }
    }
}

impl TryFrom<&StabilizationDefaults> for NoiseParameters {
    type Error = StabkitError;

    fn try_from(config: &StabilizationDefaults) -> StabkitResult<Self> {
        Self::from_config(config)
    }
}

/// Posterior belief about one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisEstimate {
    /// Denoised trajectory value.
    pub value: f64,
    /// Uncertainty of `value`.
    pub error_variance: f64,
}

impl AxisEstimate {
    /// Fixed initial belief, independent of the first measurement.
    ///
    /// Starting at zero rather than at the first measurement causes a
    /// short settling transient.
    pub const COLD_START: AxisEstimate = AxisEstimate {
        value: 0.0,
        error_variance: 1.0,
    };
}

impl Default for AxisEstimate {
    fn default() -> Self {
        Self::COLD_START
    }
}

/// Scalar Kalman filter for a single trajectory axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSmoother {
    estimate: AxisEstimate,
    last_gain: Option<f64>,
}

impl AxisSmoother {
    pub fn cold_start() -> Self {
        Self {
            estimate: AxisEstimate::COLD_START,
            last_gain: None,
        }
    }

    /// Fold in the raw accumulated trajectory value `z`.
    ///
    /// Returns the new smoothed value.
    pub fn update(&mut self, z: f64, noise: &NoiseParameters) -> f64 {
        let prior_estimate = self.estimate.value;
        let prior_variance = self.estimate.error_variance + noise.process_variance;

        let gain = prior_variance / (prior_variance + noise.measurement_variance);

        self.estimate = AxisEstimate {
            value: prior_estimate + gain * (z - prior_estimate),
            error_variance: (1.0 - gain) * prior_variance,
        };
        self.last_gain = Some(gain);
        self.estimate.value
    }

    pub fn estimate(&self) -> AxisEstimate {
        self.estimate
    }

    pub fn value(&self) -> f64 {
        self.estimate.value
    }

    /// Gain used by the most recent update, `None` before the first one.
    pub fn last_gain(&self) -> Option<f64> {
        self.last_gain
    }
}

impl Default for AxisSmoother {
    fn default() -> Self {
        Self::cold_start()
    }
}

/// Three independent axis smoothers, one per trajectory component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectorySmoother {
    x: AxisSmoother,
    y: AxisSmoother,
    angle: AxisSmoother,
}

impl TrajectorySmoother {
    pub fn cold_start() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: Axis) -> &AxisSmoother {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Angle => &self.angle,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisSmoother {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Angle => &mut self.angle,
        }
    }

    /// Update every axis with the matching component of `raw`.
    ///
    /// Returns the smoothed trajectory.
    pub fn update(&mut self, raw: &Trajectory, noise: &NoiseParameters) -> Trajectory {
        for axis in Axis::ALL {
            self.axis_mut(axis).update(raw.component(axis), noise);
        }
        self.smoothed()
    }

    /// Current smoothed trajectory.
    pub fn smoothed(&self) -> Trajectory {
        Trajectory::from_axes(|axis| self.axis(axis).value())
    }

    /// Current per-axis estimates.
    pub fn estimate(&self, axis: Axis) -> AxisEstimate {
        self.axis(axis).estimate()
    }
}
