use anyhow::Result;

use crate::detect::result::FaceBox;
use crate::frame::Frame;

/// Face detector backend trait.
///
/// Implementations must treat the frame as read-only and must not retain
/// pixel data across calls. `detect` blocks until the frame is fully
/// scanned; the loop runs one detection per captured frame.
pub trait FaceDetector {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Scan the frame and return every detected face.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>>;
}

/// Detector tuning, fixed after construction.
///
/// Defaults: a 20px minimum face size and a 1.2x size step between scan
/// scales (expressed as a 1/1.2 pyramid downscale factor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorParams {
    /// Smallest face edge, in pixels, the scan will report.
    pub min_face_size: u32,
    /// Score threshold below which windows are rejected.
    pub score_thresh: f64,
    /// Image pyramid downscale factor per level, in (0, 1).
    pub pyramid_scale: f32,
    /// Sliding-window step in both axes.
    pub window_step: u32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_thresh: 2.0,
            pyramid_scale: 1.0 / 1.2,
            window_step: 4,
        }
    }
}
