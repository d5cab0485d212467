use anyhow::Result;

use super::{CameraConfig, FrameSource};
use crate::frame::Frame;

/// Synthetic frame source for `stub://` devices.
///
/// Generates a slowly drifting gradient with a moving bright square, so the
/// filter demo has edges to respond to and the display shows visible
/// motion. Deterministic apart from optional sensor noise.
pub struct SyntheticSource {
    config: CameraConfig,
    frame_count: u64,
    connected: bool,
    /// Per-pixel noise amplitude; 0 disables noise for deterministic tests.
    noise: u8,
}

impl SyntheticSource {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            connected: false,
            noise: 0,
        }
    }

    /// Add uniform sensor noise up to `amplitude` per channel.
    pub fn with_noise(mut self, amplitude: u8) -> Self {
        self.noise = amplitude;
        self
    }

    fn generate_pixels(&mut self) -> Vec<u8> {
        let w = self.config.width as usize;
        let h = self.config.height as usize;
        let mut pixels = vec![0u8; w * h * 3];

        // Bright square orbiting the frame, one step per frame.
        let square = (w.min(h) / 4).max(1);
        let sq_x = (self.frame_count as usize * 2) % w.saturating_sub(square).max(1);
        let sq_y = (self.frame_count as usize) % h.saturating_sub(square).max(1);

        for y in 0..h {
            for x in 0..w {
                let off = (y * w + x) * 3;
                let in_square =
                    x >= sq_x && x < sq_x + square && y >= sq_y && y < sq_y + square;
                if in_square {
                    pixels[off] = 230;
                    pixels[off + 1] = 230;
                    pixels[off + 2] = 230;
                } else {
                    let phase = (self.frame_count % 256) as usize;
                    pixels[off] = ((x + phase) % 256) as u8;
                    pixels[off + 1] = ((y + phase) % 256) as u8;
                    pixels[off + 2] = 64;
                }
                if self.noise > 0 {
                    for c in 0..3 {
                        let n = rand::random::<u8>() % self.noise;
                        pixels[off + c] = pixels[off + c].saturating_add(n);
                    }
                }
            }
        }

        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        log::info!("SyntheticSource: connected to {}", self.config.device);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        self.frame_count += 1;
        let pixels = self.generate_pixels();
        Frame::from_rgb(pixels, self.config.width, self.config.height)
    }

    fn active_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn frames_captured(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_config() -> CameraConfig {
        CameraConfig {
            device: "stub://test".to_string(),
            width: 32,
            height: 24,
            target_fps: 10,
        }
    }

    #[test]
    fn frames_match_configured_size() {
        let mut source = SyntheticSource::new(stub_config());
        source.connect().unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 24);
        assert_eq!(source.frames_captured(), 1);
    }

    #[test]
    fn consecutive_frames_differ() {
        let mut source = SyntheticSource::new(stub_config());
        source.connect().unwrap();
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_ne!(a, b, "synthetic scene must move between frames");
    }

    #[test]
    fn noise_perturbs_the_scene() {
        let mut clean = SyntheticSource::new(stub_config());
        let mut noisy = SyntheticSource::new(stub_config()).with_noise(64);
        clean.connect().unwrap();
        noisy.connect().unwrap();
        assert_ne!(clean.next_frame().unwrap(), noisy.next_frame().unwrap());
    }

    #[test]
    fn noiseless_generation_is_deterministic() {
        let mut one = SyntheticSource::new(stub_config());
        let mut two = SyntheticSource::new(stub_config());
        one.connect().unwrap();
        two.connect().unwrap();
        assert_eq!(one.next_frame().unwrap(), two.next_frame().unwrap());
    }
}
