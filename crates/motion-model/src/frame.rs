//! Frame dimensions and border crop geometry.
//!
//! After warping, the stabilized frame has undefined pixels along its
//! edges. A fixed margin is cropped away and the remainder is resized back
//! to the source dimensions.

use serde::{Deserialize, Serialize};

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A frame with no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Rectangle kept after cropping the border of a warped frame.
///
/// Pixel ranges are half-open: columns `left..right`, rows `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropWindow {
    /// Compute the crop for `size` with a horizontal margin of
    /// `horizontal_border` pixels on each side.
    ///
    /// The vertical margin is `horizontal_border * height / width`, in
    /// integer pixels, so the kept region has the frame's aspect ratio.
    /// Returns `None` when nothing would remain.
    pub fn for_frame(size: FrameSize, horizontal_border: u32) -> Option<Self> {
        if size.is_empty() {
            return None;
        }
        let vertical_border =
            (horizontal_border as u64 * size.height as u64 / size.width as u64) as u32;

        let right = size.width.checked_sub(horizontal_border)?;
        let bottom = size.height.checked_sub(vertical_border)?;
        if right <= horizontal_border || bottom <= vertical_border {
            return None;
        }

        Some(Self {
            left: horizontal_border,
            top: vertical_border,
            right,
            bottom,
        })
    }

    /// Width of the kept region.
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height of the kept region.
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Dimensions of the kept region.
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width(), self.height())
    }

    /// Scale factor applied when resizing the kept region back to `output`.
    pub fn upscale_factor(&self, output: FrameSize) -> (f64, f64) {
        (
            output.width as f64 / self.width() as f64,
            output.height as f64 / self.height() as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_for_hd_frame() {
        let crop = CropWindow::for_frame(FrameSize::new(640, 480), 20).unwrap();
        assert_eq!(crop.left, 20);
        assert_eq!(crop.top, 15);
        assert_eq!(crop.right, 620);
        assert_eq!(crop.bottom, 465);
        assert_eq!(crop.size(), FrameSize::new(600, 450));
    }

    #[test]
    fn test_vertical_border_truncates() {
        // 20 * 1080 / 1920 = 11.25
        let crop = CropWindow::for_frame(FrameSize::new(1920, 1080), 20).unwrap();
        assert_eq!(crop.top, 11);
        assert_eq!(crop.bottom, 1069);
    }

    #[test]
    fn test_crop_rejects_tiny_frames() {
        assert!(CropWindow::for_frame(FrameSize::new(40, 30), 20).is_none());
        assert!(CropWindow::for_frame(FrameSize::new(0, 480), 20).is_none());
    }

    #[test]
    fn test_zero_border_keeps_everything() {
        let size = FrameSize::new(320, 240);
        let crop = CropWindow::for_frame(size, 0).unwrap();
        assert_eq!(crop.size(), size);
        assert_eq!(crop.upscale_factor(size), (1.0, 1.0));
    }

    #[test]
    fn test_empty_frame_size() {
        assert!(FrameSize::new(0, 10).is_empty());
        assert!(!FrameSize::new(1, 1).is_empty());
        assert_eq!(FrameSize::new(16, 0).aspect_ratio(), 0.0);
    }
}
