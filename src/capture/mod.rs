//! Camera frame sources.
//!
//! A demo owns exactly one source for its lifetime and pulls frames from it
//! in a blocking loop. Two backends exist:
//! - `SyntheticSource` for `stub://` devices (tests, hardware-free runs)
//! - `V4l2Source` for local devices (feature: ingest-v4l2)
//!
//! Capture failures propagate as errors and end the demo; there is no retry
//! policy.

#[cfg(feature = "ingest-v4l2")]
mod normalize;
mod synthetic;
#[cfg(feature = "ingest-v4l2")]
mod v4l2;

pub use synthetic::SyntheticSource;
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Source;

use anyhow::Result;

use crate::frame::Frame;

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device selector: a bare index ("0"), a device path ("/dev/video0"),
    /// or "stub://name" for the synthetic source.
    pub device: String,
    /// Preferred frame width. The driver may grant a different size.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
    /// Target frame rate; 0 leaves the driver default.
    pub target_fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            width: 640,
            height: 480,
            target_fps: 30,
        }
    }
}

impl CameraConfig {
    /// Resolve the device selector to a V4L2 node path.
    pub fn device_path(&self) -> String {
        match self.device.parse::<u32>() {
            Ok(index) => format!("/dev/video{}", index),
            Err(_) => self.device.clone(),
        }
    }

    pub fn is_stub(&self) -> bool {
        self.device.starts_with("stub://")
    }
}

/// Blocking frame source.
pub trait FrameSource {
    /// Open the device. Must be called before `next_frame`.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame, blocking until one is available.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Frame size actually granted by the device. Constant after
    /// `connect`.
    fn active_size(&self) -> (u32, u32);

    /// Frames captured so far.
    fn frames_captured(&self) -> u64;
}

/// Build a source for the configured device.
///
/// `stub://` devices always resolve to the synthetic source; everything
/// else needs the `ingest-v4l2` feature.
pub fn open_source(config: &CameraConfig) -> Result<Box<dyn FrameSource>> {
    if config.is_stub() {
        return Ok(Box::new(SyntheticSource::new(config.clone())));
    }

    #[cfg(feature = "ingest-v4l2")]
    {
        Ok(Box::new(V4l2Source::new(config.clone())?))
    }

    #[cfg(not(feature = "ingest-v4l2"))]
    {
        Err(anyhow::anyhow!(
            "camera device '{}' requires the ingest-v4l2 feature (use stub:// for the synthetic source)",
            config.device
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_index_resolves_to_node_path() {
        let config = CameraConfig {
            device: "0".to_string(),
            ..CameraConfig::default()
        };
        assert_eq!(config.device_path(), "/dev/video0");

        let config = CameraConfig {
            device: "/dev/video2".to_string(),
            ..CameraConfig::default()
        };
        assert_eq!(config.device_path(), "/dev/video2");
    }

    #[test]
    fn stub_devices_open_without_hardware() {
        let config = CameraConfig {
            device: "stub://cam".to_string(),
            width: 32,
            height: 24,
            target_fps: 0,
        };
        let mut source = open_source(&config).unwrap();
        source.connect().unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (32, 24));
    }

    #[cfg(not(feature = "ingest-v4l2"))]
    #[test]
    fn real_devices_need_the_capture_feature() {
        let config = CameraConfig::default();
        assert!(open_source(&config).is_err());
    }
}
