//! Frame buffer type shared by capture, filtering, and display.
//!
//! A `Frame` is a packed RGB24 buffer. Sources produce one per capture, the
//! per-frame operation mutates it in place, and the display sink reads it.
//! Only the most recent frame exists at any point in the loop.

use anyhow::{anyhow, Result};

/// Owned RGB24 image buffer.
///
/// The buffer length is validated against `width * height * 3` at
/// construction; after that, dimensions are immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap an RGB24 buffer. Fails if the length does not match the
    /// dimensions.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = rgb_len(width, height)?;
        if data.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch: expected {}, got {}",
                expected,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Allocate a black frame.
    pub fn black(width: u32, height: u32) -> Result<Self> {
        let len = rgb_len(width, height)?;
        Ok(Self {
            data: vec![0u8; len],
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel. Callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let off = ((y * self.width + x) * 3) as usize;
        [self.data[off], self.data[off + 1], self.data[off + 2]]
    }

    /// Write one pixel, ignoring coordinates outside the frame. Overlay
    /// drawing relies on this clipping.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let off = ((y as u32 * self.width + x as u32) * 3) as usize;
        self.data[off..off + 3].copy_from_slice(&rgb);
    }

    /// BT.601 grayscale plane, one byte per pixel. Used by the face
    /// detector, which runs on luminance only.
    pub fn to_luma(&self) -> Vec<u8> {
        self.data
            .chunks_exact(3)
            .map(|px| luma_601(px[0], px[1], px[2]))
            .collect()
    }

    /// Replace every channel with the BT.601 luminance, keeping RGB24
    /// layout. The gray variant of the filter demo uses this as a pre-step.
    pub fn desaturate(&mut self) {
        for px in self.data.chunks_exact_mut(3) {
            let y = luma_601(px[0], px[1], px[2]);
            px[0] = y;
            px[1] = y;
            px[2] = y;
        }
    }
}

fn rgb_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(anyhow!("frame dimensions must be non-zero"));
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(3))
        .map(|v| v as usize)
        .ok_or_else(|| anyhow!("frame dimensions overflow"))
}

/// Integer BT.601 luma approximation.
fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}
