/// One detected face, in frame pixel coordinates.
///
/// Results are per-iteration: produced by the detector, drawn, and dropped
/// before the next frame is requested.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceBox {
    /// Left edge of the bounding box.
    pub x: i32,
    /// Top edge of the bounding box.
    pub y: i32,
    pub w: u32,
    pub h: u32,
    /// Detector score for this box.
    pub score: f32,
}

impl FaceBox {
    pub fn new(x: i32, y: i32, w: u32, h: u32, score: f32) -> Self {
        Self { x, y, w, h, score }
    }

    /// Marker anchor: (x + w/2, y + h/2), integer division.
    pub fn center(&self) -> (i32, i32) {
        (self.x + (self.w / 2) as i32, self.y + (self.h / 2) as i32)
    }
}
