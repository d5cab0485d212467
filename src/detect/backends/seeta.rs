//! Face detection via the SeetaFace funnel cascade (`rustface`).
//!
//! The model is an externally-authored binary loaded once at startup and
//! read-only afterwards. A missing or unreadable model file is fatal, the
//! demo has no fallback detector.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Result};
use rustface::{create_detector_with_model, read_model, Detector, ImageData};

use crate::detect::backend::{DetectorParams, FaceDetector};
use crate::detect::result::FaceBox;
use crate::frame::Frame;

pub struct SeetaBackend {
    detector: Box<dyn Detector>,
    params: DetectorParams,
}

impl SeetaBackend {
    /// Load the cascade model from `path` and apply `params`.
    pub fn from_model_file(path: &Path, params: DetectorParams) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow!("open cascade model {}: {}", path.display(), e))?;
        let model = read_model(BufReader::new(file))
            .map_err(|e| anyhow!("read cascade model {}: {}", path.display(), e))?;
        let mut detector = create_detector_with_model(model);
        detector.set_min_face_size(params.min_face_size);
        detector.set_score_thresh(params.score_thresh);
        detector.set_pyramid_scale_factor(params.pyramid_scale);
        detector.set_slide_window_step(params.window_step, params.window_step);
        Ok(Self { detector, params })
    }

    /// The tuning this backend was built with.
    pub fn params(&self) -> DetectorParams {
        self.params
    }
}

impl FaceDetector for SeetaBackend {
    fn name(&self) -> &'static str {
        "seeta"
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>> {
        // The cascade scans luminance only.
        let luma = frame.to_luma();
        let mut image = ImageData::new(&luma, frame.width(), frame.height());
        let faces = self.detector.detect(&mut image);
        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox::new(
                    bbox.x(),
                    bbox.y(),
                    bbox.width(),
                    bbox.height(),
                    face.score() as f32,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_is_fatal() {
        let err = SeetaBackend::from_model_file(
            Path::new("/nonexistent/model.bin"),
            DetectorParams::default(),
        )
        .map(|_| ())
        .unwrap_err();
        assert!(err.to_string().contains("open cascade model"));
    }
}
