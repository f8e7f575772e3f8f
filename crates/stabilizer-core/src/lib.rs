//! Stabkit Core — The Trajectory Smoother
//!
//! Turns per-frame rigid motion estimates into a stable virtual camera path:
//! - **Accumulation:** Integrate motion samples into a cumulative trajectory
//! - **Smoothing:** Track each axis with an independent scalar Kalman filter
//! - **Correction:** Fold the smoothed-vs-raw offset back into the frame's motion
//! - **Session:** Own the per-stream state and recover from estimator failures
//!
//! This crate is pure computation. Feature tracking, warping, and video I/O
//! live behind the [`MotionEstimator`] and [`Frame`] seams.

pub mod accumulator;
pub mod correction;
pub mod estimator;
pub mod pipeline;
pub mod session;
pub mod smoother;

pub use estimator::{EstimationFailure, Frame, MotionEstimator, ReplayEstimator, SizedFrame};
pub use pipeline::{FramePipeline, WarpPlan};
pub use session::{FrameReport, SessionPhase, SessionStats, StabilizationSession};
pub use smoother::{AxisEstimate, AxisSmoother, NoiseParameters, TrajectorySmoother};
