//! camloop: live-camera demo loops.
//!
//! Two binaries share this library:
//!
//! - `filterdemo` passes each frame through a fixed 3x3 convolution kernel.
//! - `facedetect` runs a pretrained face detector per frame and overlays a
//!   crosshair on every detection.
//!
//! Both are the same single-threaded skeleton (see `runloop`): capture a
//! frame, apply one operation, present it, poll for Escape with a 20 ms
//! wait.
//!
//! # Module structure
//!
//! - `capture`: frame sources (synthetic `stub://`, V4L2 behind
//!   `ingest-v4l2`)
//! - `filter`: 3x3 kernels and convolution
//! - `detect`: face detector backends (SeetaFace cascade, stub)
//! - `draw`: detection overlays
//! - `display`: terminal window, key polling
//! - `runloop`: the capture-process-display loop
//! - `config`: file/env configuration shared by the binaries

pub mod capture;
pub mod config;
pub mod detect;
pub mod display;
pub mod draw;
pub mod filter;
pub mod frame;
pub mod runloop;

pub use capture::{open_source, CameraConfig, FrameSource};
pub use config::DemoConfig;
pub use detect::{DetectorParams, FaceBox, FaceDetector, SeetaBackend, StubBackend};
pub use display::{DisplaySink, Key, KeyPoll, NullSink, ScriptedKeys, TermKeys, TermWindow};
pub use draw::Marker;
pub use filter::{Kernel3, KernelChoice};
pub use frame::Frame;
pub use runloop::{run, ConvolveOp, DetectOp, FrameOp, LoopStats, RunOptions, POLL_INTERVAL};
