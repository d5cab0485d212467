use anyhow::Result;

use crate::detect::backend::FaceDetector;
use crate::detect::result::FaceBox;
use crate::frame::Frame;

/// Stub detector for tests and `stub://` demo runs.
///
/// Reports a scripted set of boxes: one entry per frame, cycling when the
/// script is shorter than the run.
pub struct StubBackend {
    script: Vec<Vec<FaceBox>>,
    cursor: usize,
}

impl StubBackend {
    /// A stub that never detects anything.
    pub fn empty() -> Self {
        Self::with_script(vec![vec![]])
    }

    /// Report the same boxes on every frame.
    pub fn fixed(faces: Vec<FaceBox>) -> Self {
        Self::with_script(vec![faces])
    }

    /// Report `script[i]` on frame `i`, wrapping around at the end.
    pub fn with_script(script: Vec<Vec<FaceBox>>) -> Self {
        assert!(!script.is_empty(), "stub script must not be empty");
        Self { script, cursor: 0 }
    }
}

impl FaceDetector for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceBox>> {
        let faces = self.script[self.cursor % self.script.len()].clone();
        self.cursor += 1;
        Ok(faces)
    }
}
