//! V4L2 camera source (feature: ingest-v4l2).
//!
//! Opens a local device node, negotiates RGB24 with a YUYV fallback, and
//! streams frames through memory-mapped buffers. The device handle lives
//! for the lifetime of the source and is released on drop.

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use super::normalize::{expected_len, normalize_to_rgb, PixelFormat};
use super::{CameraConfig, FrameSource};
use crate::frame::Frame;

pub struct V4l2Source {
    config: CameraConfig,
    state: Option<V4l2State>,
    frame_count: u64,
    active_width: u32,
    active_height: u32,
    active_format: PixelFormat,
}

#[self_referencing]
struct V4l2State {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Source {
    pub fn new(config: CameraConfig) -> Result<Self> {
        Ok(Self {
            active_width: config.width,
            active_height: config.height,
            active_format: PixelFormat::Rgb24,
            config,
            state: None,
            frame_count: 0,
        })
    }
}

impl FrameSource for V4l2Source {
    fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let path = self.config.device_path();
        let mut device =
            v4l::Device::with_path(&path).with_context(|| format!("open v4l2 device {}", path))?;

        // Size negotiation is best-effort: ask for the configured size and
        // take whatever the driver grants.
        let mut format = device.format().context("read v4l2 format")?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("V4l2Source: failed to set format on {}: {}", path, err);
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        self.active_format = if format.fourcc == v4l::FourCC::new(b"RGB3") {
            PixelFormat::Rgb24
        } else if format.fourcc == v4l::FourCC::new(b"YUYV") {
            PixelFormat::Yuyv
        } else {
            return Err(anyhow!(
                "unsupported capture format {} on {}",
                format.fourcc,
                path
            ));
        };

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!("V4l2Source: failed to set fps on {}: {}", path, err);
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;

        let state = V4l2StateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;
        self.state = Some(state);

        log::info!(
            "V4l2Source: connected to {} ({}x{}, {:?})",
            path,
            self.active_width,
            self.active_height,
            self.active_format
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("v4l2 device not connected")?;
        let (buf, _meta) = state
            .with_mut(|fields| fields.stream.next())
            .map_err(|err| anyhow::Error::new(err).context("capture v4l2 frame"))?;

        // Mapped buffers may be padded past the payload.
        let expected = expected_len(self.active_width, self.active_height, self.active_format)?;
        let payload = buf.get(..expected).ok_or_else(|| {
            anyhow!("short v4l2 frame: got {} bytes, need {}", buf.len(), expected)
        })?;
        let rgb = normalize_to_rgb(payload, self.active_width, self.active_height, self.active_format)?;
        self.frame_count += 1;
        Frame::from_rgb(rgb, self.active_width, self.active_height)
    }

    fn active_size(&self) -> (u32, u32) {
        (self.active_width, self.active_height)
    }

    fn frames_captured(&self) -> u64 {
        self.frame_count
    }
}
