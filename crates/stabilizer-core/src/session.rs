//! Stabilization session: per-stream state and the per-frame protocol.
//!
//! A session owns the running raw trajectory, the three axis smoothers,
//! and the last corrective transform. Feed it exactly one estimator
//! outcome per frame, in order. A session serves one stream; run separate
//! sessions for concurrent streams.

use serde::Serialize;
use stabkit_common::{StabilizationDefaults, StabkitResult};
use stabkit_motion_model::{Axis, CorrectiveTransform, FrameIndex, MotionSample, Trajectory};

use crate::accumulator::accumulate;
use crate::correction::synthesize;
use crate::estimator::EstimationFailure;
use crate::smoother::{AxisEstimate, NoiseParameters, TrajectorySmoother};

/// Externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No frame processed yet.
    Uninitialized,
    /// At least one frame processed.
    Running,
}

#[derive(Debug, Clone)]
enum Lifecycle {
    Uninitialized,
    Running { smoother: TrajectorySmoother },
}

/// Everything the session produced for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// Zero-based index of the frame.
    pub frame: FrameIndex,
    /// Raw motion actually used (the estimate, or the fallback).
    pub sample: MotionSample,
    /// Why the estimate was replaced, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Raw accumulated trajectory.
    pub trajectory: Trajectory,
    /// Smoothed trajectory.
    pub smoothed: Trajectory,
    /// Correction to hand to the warper.
    pub transform: CorrectiveTransform,
}

/// Counters over the session's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Frames processed.
    pub frames: u64,
    /// Frames whose estimate was replaced by the previous correction.
    pub fallbacks: u64,
}

/// Causal trajectory smoother for one video stream.
#[derive(Debug, Clone)]
pub struct StabilizationSession {
    noise: NoiseParameters,
    lifecycle: Lifecycle,
    trajectory: Trajectory,
    transform: CorrectiveTransform,
    last_sample: MotionSample,
    stats: SessionStats,
}

impl StabilizationSession {
    pub fn new(noise: NoiseParameters) -> Self {
        Self {
            noise,
            lifecycle: Lifecycle::Uninitialized,
            trajectory: Trajectory::ORIGIN,
            transform: CorrectiveTransform::IDENTITY,
            last_sample: MotionSample::ZERO,
            stats: SessionStats::default(),
        }
    }

    /// Create a session with the noise model from config.
    pub fn from_config(config: &StabilizationDefaults) -> StabkitResult<Self> {
        Ok(Self::new(NoiseParameters::from_config(config)?))
    }

    /// Run one frame through accumulation, smoothing, and correction.
    ///
    /// A failed (or non-finite) estimate is replaced by the previous
    /// frame's corrective transform; the frame is still processed.
    pub fn process(
        &mut self,
        estimate: Result<MotionSample, EstimationFailure>,
    ) -> FrameReport {
        let frame = self.stats.frames;

        let (sample, fallback) = match estimate {
            Ok(sample) if sample.is_finite() => (sample, None),
            Ok(sample) => {
                let reason = format!("non-finite estimate {sample:?}");
                (self.fallback_sample(frame, &reason), Some(reason))
            }
            Err(failure) => {
                let reason = failure.to_string();
                (self.fallback_sample(frame, &reason), Some(reason))
            }
        };

        self.trajectory = accumulate(self.trajectory, sample);

        let smoothed = match &mut self.lifecycle {
            Lifecycle::Uninitialized => {
                tracing::info!(
                    process_variance = self.noise.process_variance(),
                    measurement_variance = self.noise.measurement_variance(),
                    "Stabilization session started"
                );
                let smoother = TrajectorySmoother::cold_start();
                let smoothed = smoother.smoothed();
                self.lifecycle = Lifecycle::Running { smoother };
                smoothed
            }
            Lifecycle::Running { smoother } => smoother.update(&self.trajectory, &self.noise),
        };

        self.transform = synthesize(&self.trajectory, &smoothed, &sample);
        self.last_sample = sample;
        self.stats.frames += 1;
        if fallback.is_some() {
            self.stats.fallbacks += 1;
        }

        tracing::debug!(
            frame,
            dx = self.transform.dx,
            dy = self.transform.dy,
            da = self.transform.da,
            x = self.trajectory.x,
            sx = smoothed.x,
            "Processed frame"
        );

        FrameReport {
            frame,
            sample,
            fallback,
            trajectory: self.trajectory,
            smoothed,
            transform: self.transform,
        }
    }

    fn fallback_sample(&self, frame: FrameIndex, reason: &str) -> MotionSample {
        tracing::warn!(frame, reason, "Motion estimate unusable; reusing last correction");
        self.transform.as_sample()
    }

    /// Overwrite the running raw trajectory.
    ///
    /// Smoother state is left alone, so the smoothed path will glide
    /// toward the new pose over the following frames.
    pub fn reset_trajectory_to(&mut self, x: f64, y: f64, a: f64) {
        tracing::debug!(x, y, a, "Trajectory reset");
        self.trajectory = Trajectory::new(x, y, a);
    }

    pub fn phase(&self) -> SessionPhase {
        match self.lifecycle {
            Lifecycle::Uninitialized => SessionPhase::Uninitialized,
            Lifecycle::Running { .. } => SessionPhase::Running,
        }
    }

    /// Corrective transform of the most recent frame.
    pub fn current_transform(&self) -> CorrectiveTransform {
        self.transform
    }

    /// Raw accumulated trajectory after the most recent frame.
    pub fn trajectory(&self) -> Trajectory {
        self.trajectory
    }

    /// Smoothed trajectory after the most recent frame.
    pub fn smoothed_trajectory(&self) -> Trajectory {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Trajectory::ORIGIN,
            Lifecycle::Running { smoother } => smoother.smoothed(),
        }
    }

    /// Posterior estimate for one axis (cold-start values before any frame).
    pub fn axis_estimate(&self, axis: Axis) -> AxisEstimate {
        match &self.lifecycle {
            Lifecycle::Uninitialized => AxisEstimate::COLD_START,
            Lifecycle::Running { smoother } => smoother.estimate(axis),
        }
    }

    /// Gain of the most recent smoother update on `axis`.
    pub fn last_gain(&self, axis: Axis) -> Option<f64> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => None,
            Lifecycle::Running { smoother } => smoother.axis(axis).last_gain(),
        }
    }

    /// Raw motion used by the most recent frame.
    pub fn last_sample(&self) -> MotionSample {
        self.last_sample
    }

    /// Number of frames processed.
    pub fn frame_count(&self) -> u64 {
        self.stats.frames
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn noise(&self) -> &NoiseParameters {
        &self.noise
    }
}

impl Default for StabilizationSession {
    fn default() -> Self {
        Self::new(NoiseParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut StabilizationSession, samples: &[(f64, f64, f64)]) -> Vec<FrameReport> {
        samples
            .iter()
            .map(|&(dx, dy, da)| session.process(Ok(MotionSample::new(dx, dy, da))))
            .collect()
    }

    #[test]
    fn test_defaults_before_first_frame() {
        let session = StabilizationSession::default();
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(session.frame_count(), 0);
        assert_eq!(session.current_transform(), CorrectiveTransform::IDENTITY);
        assert_eq!(session.trajectory(), Trajectory::ORIGIN);
        assert_eq!(session.smoothed_trajectory(), Trajectory::ORIGIN);
        assert_eq!(session.axis_estimate(Axis::X), AxisEstimate::COLD_START);
        assert_eq!(session.last_gain(Axis::X), None);
    }

    #[test]
    fn test_cold_start_ignores_first_measurement() {
        let mut session = StabilizationSession::default();
        let report = session.process(Ok(MotionSample::new(500.0, -300.0, 1.2)));

        assert_eq!(session.phase(), SessionPhase::Running);
        for axis in Axis::ALL {
            assert_eq!(session.axis_estimate(axis), AxisEstimate::COLD_START);
        }
        assert_eq!(report.trajectory, Trajectory::new(500.0, -300.0, 1.2));
        assert_eq!(report.smoothed, Trajectory::ORIGIN);
        // Smoothed pose at the origin cancels the first frame's motion.
        assert_eq!(report.transform, CorrectiveTransform::IDENTITY);
    }

    #[test]
    fn test_spike_is_partially_rejected_then_tracked() {
        let mut session = StabilizationSession::default();
        let reports = run(
            &mut session,
            &[
                (1.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (-10.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
            ],
        );

        let raw2 = reports[1].trajectory.x;
        let raw3 = reports[2].trajectory.x;
        let smooth3 = reports[2].smoothed.x;
        assert_eq!((raw2, raw3), (2.0, -8.0));
        assert!(smooth3 < raw2 && smooth3 > raw3, "smoothed x={smooth3}");

        let frame6 = &reports[5];
        assert!(
            (frame6.smoothed.x - frame6.trajectory.x).abs() < 0.5,
            "smoothed {} vs raw {}",
            frame6.smoothed.x,
            frame6.trajectory.x
        );
        assert_eq!(session.frame_count(), 6);
    }

    #[test]
    fn test_report_matches_accessors() {
        let mut session = StabilizationSession::default();
        let reports = run(&mut session, &[(2.0, 1.0, 0.01), (-1.0, 0.5, 0.02)]);
        let last = reports.last().unwrap();
        assert_eq!(last.frame, 1);
        assert_eq!(session.current_transform(), last.transform);
        assert_eq!(session.trajectory(), last.trajectory);
        assert_eq!(session.smoothed_trajectory(), last.smoothed);
        assert_eq!(session.last_sample(), MotionSample::new(-1.0, 0.5, 0.02));
    }

    #[test]
    fn test_correction_identity_each_frame() {
        let mut session = StabilizationSession::default();
        let reports = run(
            &mut session,
            &[(3.0, -1.0, 0.02), (2.5, 0.0, -0.01), (-4.0, 2.0, 0.0), (0.5, 0.5, 0.005)],
        );
        for r in reports {
            for axis in Axis::ALL {
                let offset = r.smoothed.component(axis) - r.trajectory.component(axis);
                assert_eq!(
                    r.transform.component(axis),
                    r.sample.component(axis) + offset
                );
            }
        }
    }

    #[test]
    fn test_fallback_reuses_previous_correction() {
        let mut session = StabilizationSession::default();
        run(&mut session, &[(1.0, 2.0, 0.01), (1.5, 2.5, 0.02), (0.5, -1.0, 0.0)]);
        let previous = session.current_transform();

        let report = session.process(Err(EstimationFailure::NoCorrespondence));
        assert_eq!(report.sample, previous.as_sample());
        assert_eq!(
            report.fallback.as_deref(),
            Some("no feature correspondence between frames")
        );
        assert_eq!(session.frame_count(), 4);
        assert_eq!(
            session.stats(),
            SessionStats {
                frames: 4,
                fallbacks: 1
            }
        );
    }

    #[test]
    fn test_failure_on_first_frame_uses_identity() {
        let mut session = StabilizationSession::default();
        let report = session.process(Err(EstimationFailure::DegeneratePointSet { matched: 1 }));
        assert_eq!(report.sample, MotionSample::ZERO);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.trajectory(), Trajectory::ORIGIN);
    }

    #[test]
    fn test_non_finite_estimate_falls_back() {
        let mut session = StabilizationSession::default();
        run(&mut session, &[(1.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let previous = session.current_transform();

        let report = session.process(Ok(MotionSample::new(f64::NAN, 0.0, 0.0)));
        assert_eq!(report.sample, previous.as_sample());
        assert!(report.fallback.is_some());
        assert!(session.smoothed_trajectory().x.is_finite());
    }

    #[test]
    fn test_repeated_failures_keep_running() {
        let mut session = StabilizationSession::default();
        run(&mut session, &[(2.0, 0.0, 0.0); 5]);
        for _ in 0..20 {
            let report = session.process(Err(EstimationFailure::NoCorrespondence));
            assert!(report.transform.dx.is_finite());
        }
        run(&mut session, &[(2.0, 0.0, 0.0); 100]);
        assert_eq!(session.stats().fallbacks, 20);
        assert_eq!(session.frame_count(), 125);
        assert!(session.smoothed_trajectory().x.is_finite());
    }

    #[test]
    fn test_reset_trajectory() {
        let mut session = StabilizationSession::default();
        run(&mut session, &[(5.0, 5.0, 0.1); 3]);
        let smoothed_before = session.smoothed_trajectory();

        session.reset_trajectory_to(0.0, 0.0, 0.0);
        assert_eq!(session.trajectory(), Trajectory::ORIGIN);
        assert_eq!(session.smoothed_trajectory(), smoothed_before);

        let report = session.process(Ok(MotionSample::new(1.0, 1.0, 0.0)));
        assert_eq!(report.trajectory, Trajectory::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reset_before_first_frame_offsets_seed() {
        let mut session = StabilizationSession::default();
        session.reset_trajectory_to(10.0, 0.0, 0.0);
        let report = session.process(Ok(MotionSample::translation(1.0, 0.0)));
        assert_eq!(report.trajectory.x, 11.0);
    }

    #[test]
    fn test_from_config_validates_noise() {
        let bad = StabilizationDefaults {
            measurement_variance: -1.0,
            ..Default::default()
        };
        assert!(StabilizationSession::from_config(&bad).is_err());
        assert!(StabilizationSession::from_config(&StabilizationDefaults::default()).is_ok());
    }

    #[test]
    fn test_independent_sessions() {
        let mut a = StabilizationSession::default();
        let mut b = StabilizationSession::default();
        run(&mut a, &[(3.0, 0.0, 0.0); 4]);
        assert_eq!(b.frame_count(), 0);
        run(&mut b, &[(3.0, 0.0, 0.0); 4]);
        assert_eq!(a.smoothed_trajectory(), b.smoothed_trajectory());
    }
}
