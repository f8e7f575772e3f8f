//! Frame-level driver around a [`StabilizationSession`].
//!
//! The pipeline holds the previous raw frame, asks the estimator for the
//! motion between it and the incoming frame, runs the session, and hands
//! back a [`WarpPlan`]: the frame to warp, the matrix, and the crop.
//!
//! The plan's source is the *previous* raw frame re-synthesized under the
//! corrected motion, so output lags input by one frame.

use stabkit_common::{StabilizationDefaults, StabkitError, StabkitResult};
use stabkit_motion_model::{CropWindow, FrameIndex, FrameSize, RigidAffine};

use crate::estimator::{Frame, MotionEstimator};
use crate::session::{FrameReport, StabilizationSession};
use crate::smoother::NoiseParameters;

/// Instructions for the external warper for one output frame.
#[derive(Debug, Clone)]
pub struct WarpPlan<F> {
    /// Frame to warp.
    pub source: F,
    /// Rigid matrix to warp `source` by.
    pub matrix: RigidAffine,
    /// Region kept after warping.
    pub crop: CropWindow,
    /// Size to resize the cropped region back to.
    pub output_size: FrameSize,
    /// Session output for this frame.
    pub report: FrameReport,
}

impl<F> WarpPlan<F> {
    pub fn frame(&self) -> FrameIndex {
        self.report.frame
    }
}

/// Owns a session, an estimator, and the previous raw frame.
pub struct FramePipeline<F, E> {
    session: StabilizationSession,
    estimator: E,
    horizontal_border: u32,
    previous: Option<F>,
    geometry: Option<(FrameSize, CropWindow)>,
}

impl<F, E> FramePipeline<F, E>
where
    F: Frame + Clone,
    E: MotionEstimator<F>,
{
    pub fn new(noise: NoiseParameters, horizontal_border: u32, estimator: E) -> Self {
        Self {
            session: StabilizationSession::new(noise),
            estimator,
            horizontal_border,
            previous: None,
            geometry: None,
        }
    }

    pub fn from_config(config: &StabilizationDefaults, estimator: E) -> StabkitResult<Self> {
        Ok(Self::new(
            NoiseParameters::from_config(config)?,
            config.horizontal_border_crop,
            estimator,
        ))
    }

    /// Process one incoming frame.
    ///
    /// Fails with [`StabkitError::InvalidFrame`] for an empty frame, a frame
    /// too small for the border crop, or a frame whose size differs from the
    /// first one. A failed call leaves all state untouched.
    pub fn process(&mut self, frame: F) -> StabkitResult<WarpPlan<F>> {
        let size = frame.size();
        if frame.is_empty() {
            return Err(StabkitError::invalid_frame(format!(
                "empty frame ({}x{})",
                size.width, size.height
            )));
        }

        let (output_size, crop) = match self.geometry {
            Some((expected, crop)) => {
                if size != expected {
                    return Err(StabkitError::invalid_frame(format!(
                        "frame is {}x{}, stream is {}x{}",
                        size.width, size.height, expected.width, expected.height
                    )));
                }
                (expected, crop)
            }
            None => {
                let crop = CropWindow::for_frame(size, self.horizontal_border).ok_or_else(|| {
                    StabkitError::invalid_frame(format!(
                        "{}x{} frame is too small for a {}px border",
                        size.width, size.height, self.horizontal_border
                    ))
                })?;
                tracing::debug!(
                    width = size.width,
                    height = size.height,
                    left = crop.left,
                    top = crop.top,
                    "Stream geometry fixed"
                );
                self.geometry = Some((size, crop));
                (size, crop)
            }
        };

        let previous = match self.previous.take() {
            Some(previous) => previous,
            None => frame.clone(),
        };

        let estimate = self.estimator.estimate(&previous, &frame);
        let report = self.session.process(estimate);
        self.previous = Some(frame);

        Ok(WarpPlan {
            source: previous,
            matrix: report.transform.to_affine(),
            crop,
            output_size,
            report,
        })
    }

    pub fn session(&self) -> &StabilizationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut StabilizationSession {
        &mut self.session
    }

    /// Crop window, once the first frame has fixed the stream size.
    pub fn crop(&self) -> Option<CropWindow> {
        self.geometry.map(|(_, crop)| crop)
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}
