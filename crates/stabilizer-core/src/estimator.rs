//! Seams to the external motion estimator and frame source.
//!
//! Feature detection and correspondence are not part of this crate. A host
//! plugs in anything that can turn two frames into a rigid motion, or say
//! why it could not.

use std::collections::VecDeque;

use stabkit_motion_model::{FrameIndex, FrameSize, MotionOutcome, MotionRecord, MotionSample};

/// A video frame as seen by the stabilizer.
///
/// Only the dimensions matter here; pixel access belongs to the estimator
/// and warper.
pub trait Frame {
    fn size(&self) -> FrameSize;

    /// A missing or zero-sized frame.
    fn is_empty(&self) -> bool {
        self.size().is_empty()
    }
}

/// A frame that carries nothing but its dimensions.
///
/// Useful when replaying a motion log, where the estimator never looks at
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizedFrame(pub FrameSize);

impl Frame for SizedFrame {
    fn size(&self) -> FrameSize {
        self.0
    }
}

/// Why the estimator produced no transform for a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationFailure {
    #[error("no feature correspondence between frames")]
    NoCorrespondence,

    #[error("degenerate point set ({matched} matched points)")]
    DegeneratePointSet { matched: usize },

    #[error("no recorded estimate for frame {frame}")]
    Unavailable { frame: FrameIndex },

    #[error("estimator failed: {reason}")]
    Estimator { reason: String },
}

/// Best-fit 2-D rigid motion between consecutive frames.
///
/// `dx`/`dy` must be in the frame's pixel units and `da` in radians, with
/// the rotation convention of [`stabkit_motion_model::RigidAffine`].
pub trait MotionEstimator<F: Frame> {
    fn estimate(&mut self, previous: &F, current: &F) -> Result<MotionSample, EstimationFailure>;
}

impl<F, T> MotionEstimator<F> for T
where
    F: Frame,
    T: FnMut(&F, &F) -> Result<MotionSample, EstimationFailure>,
{
    fn estimate(&mut self, previous: &F, current: &F) -> Result<MotionSample, EstimationFailure> {
        self(previous, current)
    }
}

/// Replays recorded estimator outcomes, one per call, by frame index.
///
/// Frames with no record report [`EstimationFailure::Unavailable`].
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    records: VecDeque<MotionRecord>,
    next_frame: FrameIndex,
}

impl ReplayEstimator {
    /// `records` must be sorted by frame, as [`stabkit_motion_model::parse_motion_log`]
    /// guarantees.
    pub fn new(records: impl IntoIterator<Item = MotionRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            next_frame: 0,
        }
    }

    /// Records not yet consumed.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// Index of the frame the next call will be answered for.
    pub fn next_frame(&self) -> FrameIndex {
        self.next_frame
    }

    fn take(&mut self) -> Result<MotionSample, EstimationFailure> {
        let frame = self.next_frame;
        self.next_frame += 1;

        while self.records.front().is_some_and(|r| r.frame < frame) {
            self.records.pop_front();
        }
        let record = match self.records.front() {
            Some(r) if r.frame == frame => self.records.pop_front(),
            _ => None,
        };
        match record.map(|r| r.outcome) {
            Some(MotionOutcome::Failed { reason }) => Err(EstimationFailure::Estimator { reason }),
            Some(outcome) => outcome
                .sample()
                .ok_or(EstimationFailure::Unavailable { frame }),
            None => Err(EstimationFailure::Unavailable { frame }),
        }
    }
}

impl<F: Frame> MotionEstimator<F> for ReplayEstimator {
    fn estimate(&mut self, _previous: &F, _current: &F) -> Result<MotionSample, EstimationFailure> {
        self.take()
    }
}
