//! Overlay drawing for detection results.
//!
//! Everything here writes straight into the RGB frame buffer and clips at
//! the frame edges, so detections near a border are safe to draw.

use crate::detect::FaceBox;
use crate::frame::Frame;

/// Overlay color for detections.
pub const GREEN: [u8; 3] = [0, 255, 0];

/// Crosshair arm length in pixels, measured from the center.
pub const CROSSHAIR_ARM: i32 = 5;

/// Marker style for detected faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Marker {
    #[default]
    Crosshair,
    Box,
}

impl std::str::FromStr for Marker {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "crosshair" => Ok(Marker::Crosshair),
            "box" => Ok(Marker::Box),
            other => Err(anyhow::anyhow!(
                "unknown marker '{}' (expected crosshair or box)",
                other
            )),
        }
    }
}

/// Draw one marker per detection.
pub fn draw_detections(frame: &mut Frame, faces: &[FaceBox], marker: Marker) {
    for face in faces {
        match marker {
            Marker::Crosshair => draw_crosshair(frame, face),
            Marker::Box => draw_box(frame, face),
        }
    }
}

/// Crosshair centered on the face box: a horizontal and a vertical arm
/// through (x + w/2, y + h/2).
pub fn draw_crosshair(frame: &mut Frame, face: &FaceBox) {
    let (cx, cy) = face.center();
    hline(frame, cx - CROSSHAIR_ARM, cx + CROSSHAIR_ARM, cy, GREEN);
    vline(frame, cx, cy - CROSSHAIR_ARM, cy + CROSSHAIR_ARM, GREEN);
}

/// One-pixel rectangle outline around the face box.
pub fn draw_box(frame: &mut Frame, face: &FaceBox) {
    let x0 = face.x;
    let y0 = face.y;
    let x1 = face.x + face.w as i32;
    let y1 = face.y + face.h as i32;
    hline(frame, x0, x1, y0, GREEN);
    hline(frame, x0, x1, y1, GREEN);
    vline(frame, x0, y0, y1, GREEN);
    vline(frame, x1, y0, y1, GREEN);
}

fn hline(frame: &mut Frame, x0: i32, x1: i32, y: i32, rgb: [u8; 3]) {
    for x in x0.min(x1)..=x0.max(x1) {
        frame.put_pixel(x, y, rgb);
    }
}

fn vline(frame: &mut Frame, x: i32, y0: i32, y1: i32, rgb: [u8; 3]) {
    for y in y0.min(y1)..=y0.max(y1) {
        frame.put_pixel(x, y, rgb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green_pixels(frame: &Frame) -> Vec<(u32, u32)> {
        let mut hits = Vec::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) == GREEN {
                    hits.push((x, y));
                }
            }
        }
        hits
    }

    #[test]
    fn crosshair_is_centered_on_the_box() {
        let mut frame = Frame::black(40, 40).unwrap();
        let face = FaceBox::new(10, 8, 12, 16, 1.0);
        draw_crosshair(&mut frame, &face);

        // Center at (10 + 12/2, 8 + 16/2) = (16, 16).
        assert_eq!(face.center(), (16, 16));
        assert_eq!(frame.pixel(16, 16), GREEN);
        assert_eq!(frame.pixel(11, 16), GREEN);
        assert_eq!(frame.pixel(21, 16), GREEN);
        assert_eq!(frame.pixel(16, 11), GREEN);
        assert_eq!(frame.pixel(16, 21), GREEN);
        // Arms stop after five pixels.
        assert_ne!(frame.pixel(10, 16), GREEN);
        assert_ne!(frame.pixel(16, 10), GREEN);

        // Two 11-pixel arms sharing the center pixel.
        assert_eq!(green_pixels(&frame).len(), 21);
    }

    #[test]
    fn one_crosshair_per_detection() {
        let mut frame = Frame::black(64, 64).unwrap();
        let faces = vec![
            FaceBox::new(4, 4, 10, 10, 0.9),
            FaceBox::new(40, 40, 10, 10, 0.8),
        ];
        draw_detections(&mut frame, &faces, Marker::Crosshair);
        assert_eq!(green_pixels(&frame).len(), 42);
    }

    #[test]
    fn crosshair_clips_at_frame_edges() {
        let mut frame = Frame::black(8, 8).unwrap();
        // Center lands at (1, 1); the left and top arms run off-frame.
        let face = FaceBox::new(0, 0, 2, 2, 1.0);
        draw_crosshair(&mut frame, &face);
        assert_eq!(frame.pixel(1, 1), GREEN);
        // No panic and nothing drawn outside: 5+2 horizontal, 5+2 vertical,
        // minus the shared center.
        assert_eq!(green_pixels(&frame).len(), 13);
    }

    #[test]
    fn box_marker_outlines_the_detection() {
        let mut frame = Frame::black(32, 32).unwrap();
        let face = FaceBox::new(5, 6, 10, 8, 1.0);
        draw_detections(&mut frame, std::slice::from_ref(&face), Marker::Box);
        assert_eq!(frame.pixel(5, 6), GREEN);
        assert_eq!(frame.pixel(15, 14), GREEN);
        assert_eq!(frame.pixel(10, 6), GREEN);
        assert_eq!(frame.pixel(5, 10), GREEN);
        assert_ne!(frame.pixel(10, 10), GREEN);
    }
}
