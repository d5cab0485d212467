//! Fixed 3x3 convolution kernels for the filter demo.
//!
//! The kernel is built once at startup and never mutated; each loop
//! iteration passes the current frame through `Kernel3::apply_in_place`.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::frame::Frame;

/// The filter demo's default kernel: a diagonal emboss.
pub const EMBOSS: Kernel3 = Kernel3::new([[0.0, 1.0, 2.0], [-1.0, 0.0, 1.0], [-2.0, -1.0, 0.0]]);

/// 3x3 Gaussian smoothing kernel.
pub const GAUSSIAN: Kernel3 = Kernel3::new([
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
]);

/// Pass-through kernel, mostly useful for tests and latency measurements.
pub const IDENTITY: Kernel3 = Kernel3::new([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);

/// Immutable 3x3 convolution kernel, center anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel3 {
    weights: [[f32; 3]; 3],
}

impl Kernel3 {
    pub const fn new(weights: [[f32; 3]; 3]) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[[f32; 3]; 3] {
        &self.weights
    }

    /// Convolve the frame per channel into a fresh buffer.
    ///
    /// Edge pixels use replicated borders, and results saturate to the
    /// 0..=255 range.
    pub fn apply(&self, frame: &Frame) -> Frame {
        let mut out = frame.clone();
        self.convolve(frame.pixels(), out.pixels_mut(), frame.width(), frame.height());
        out
    }

    /// Convolve the frame, overwriting it in place.
    pub fn apply_in_place(&self, frame: &mut Frame) {
        let src = frame.pixels().to_vec();
        let (width, height) = (frame.width(), frame.height());
        self.convolve(&src, frame.pixels_mut(), width, height);
    }

    fn convolve(&self, src: &[u8], dst: &mut [u8], width: u32, height: u32) {
        let w = width as i64;
        let h = height as i64;
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0f32; 3];
                for (ky, row) in self.weights.iter().enumerate() {
                    for (kx, &weight) in row.iter().enumerate() {
                        // Replicate the border by clamping tap coordinates.
                        let sy = (y + ky as i64 - 1).clamp(0, h - 1);
                        let sx = (x + kx as i64 - 1).clamp(0, w - 1);
                        let off = ((sy * w + sx) * 3) as usize;
                        acc[0] += weight * src[off] as f32;
                        acc[1] += weight * src[off + 1] as f32;
                        acc[2] += weight * src[off + 2] as f32;
                    }
                }
                let off = ((y * w + x) * 3) as usize;
                dst[off] = saturate(acc[0]);
                dst[off + 1] = saturate(acc[1]);
                dst[off + 2] = saturate(acc[2]);
            }
        }
    }
}

fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Named kernels selectable from the filter demo CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelChoice {
    Emboss,
    Gaussian,
    Identity,
}

impl KernelChoice {
    pub fn kernel(&self) -> Kernel3 {
        match self {
            KernelChoice::Emboss => EMBOSS,
            KernelChoice::Gaussian => GAUSSIAN,
            KernelChoice::Identity => IDENTITY,
        }
    }
}

impl FromStr for KernelChoice {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "emboss" => Ok(KernelChoice::Emboss),
            "gaussian" => Ok(KernelChoice::Gaussian),
            "identity" => Ok(KernelChoice::Identity),
            other => Err(anyhow!(
                "unknown kernel '{}' (expected emboss, gaussian, or identity)",
                other
            )),
        }
    }
}

impl fmt::Display for KernelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelChoice::Emboss => "emboss",
            KernelChoice::Gaussian => "gaussian",
            KernelChoice::Identity => "identity",
        };
        f.write_str(name)
    }
}
