//! The shared capture-process-display loop.
//!
//! Both demos instantiate the same skeleton: acquire one frame (blocking),
//! apply exactly one per-frame operation, present the result, poll the
//! keyboard with a bounded wait, and stop when Escape arrives. One frame is
//! fully processed before the next is requested; there is no retry policy
//! and no concurrency.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::capture::FrameSource;
use crate::detect::FaceDetector;
use crate::display::{DisplaySink, Key, KeyPoll};
use crate::draw::{self, Marker};
use crate::filter::Kernel3;
use crate::frame::Frame;

/// Keyboard poll wait per loop iteration.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exactly one operation applied to each captured frame.
pub trait FrameOp {
    fn apply(&mut self, frame: &mut Frame) -> Result<()>;
}

/// Filter demo operation: fixed 3x3 convolution, optionally on a
/// desaturated frame.
pub struct ConvolveOp {
    kernel: Kernel3,
    gray: bool,
}

impl ConvolveOp {
    pub fn new(kernel: Kernel3, gray: bool) -> Self {
        Self { kernel, gray }
    }
}

impl FrameOp for ConvolveOp {
    fn apply(&mut self, frame: &mut Frame) -> Result<()> {
        if self.gray {
            frame.desaturate();
        }
        self.kernel.apply_in_place(frame);
        Ok(())
    }
}

/// Face demo operation: detect, then overlay one marker per detection.
pub struct DetectOp {
    backend: Box<dyn FaceDetector>,
    marker: Marker,
    detections: u64,
}

impl DetectOp {
    pub fn new(backend: Box<dyn FaceDetector>, marker: Marker) -> Self {
        Self {
            backend,
            marker,
            detections: 0,
        }
    }

    /// Total detections across the run.
    pub fn detections(&self) -> u64 {
        self.detections
    }
}

impl FrameOp for DetectOp {
    fn apply(&mut self, frame: &mut Frame) -> Result<()> {
        let faces = self.backend.detect(frame)?;
        self.detections += faces.len() as u64;
        if !faces.is_empty() {
            log::debug!("{}: {} face(s)", self.backend.name(), faces.len());
        }
        draw::draw_detections(frame, &faces, self.marker);
        Ok(())
    }
}

/// Loop tuning. `Default` matches the interactive demos: poll 20 ms,
/// run until Escape.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Stop after this many frames even without Escape. Used by tests and
    /// headless runs; `None` runs until a quit condition.
    pub max_frames: Option<u64>,
    /// Cooperative shutdown flag, typically wired to SIGINT.
    pub shutdown: Option<Arc<AtomicBool>>,
    /// Where `s` keypresses write PNG snapshots. Disabled when `None`.
    pub snapshot_dir: Option<PathBuf>,
}

impl RunOptions {
    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Summary of a finished loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopStats {
    pub frames: u64,
    pub snapshots: u64,
    pub elapsed: Duration,
}

impl LoopStats {
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Run the loop until Escape, shutdown, or the frame cap.
pub fn run(
    source: &mut dyn FrameSource,
    op: &mut dyn FrameOp,
    sink: &mut dyn DisplaySink,
    keys: &mut dyn KeyPoll,
    opts: &RunOptions,
) -> Result<LoopStats> {
    let start = Instant::now();
    let mut stats = LoopStats::default();

    loop {
        if opts.shutdown_requested() {
            log::info!("runloop: shutdown requested");
            break;
        }
        if opts.max_frames.is_some_and(|cap| stats.frames >= cap) {
            break;
        }

        let mut frame = source.next_frame()?;
        op.apply(&mut frame)?;
        sink.present(&frame)?;
        stats.frames += 1;

        match keys.poll_key(POLL_INTERVAL)? {
            Some(Key::Esc) => break,
            Some(Key::Char('s')) => {
                if let Some(dir) = &opts.snapshot_dir {
                    let path = save_snapshot(dir, &frame, stats.frames)?;
                    stats.snapshots += 1;
                    log::info!("runloop: wrote snapshot {}", path.display());
                }
            }
            // Any other key, or a timeout, continues the loop.
            _ => {}
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

fn save_snapshot(dir: &std::path::Path, frame: &Frame, seq: u64) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create snapshot dir {}", dir.display()))?;
    let path = dir.join(format!("frame_{:05}.png", seq));
    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        .context("frame buffer does not match its dimensions")?;
    img.save(&path)
        .with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CameraConfig, SyntheticSource};
    use crate::detect::{FaceBox, StubBackend};
    use crate::display::{NullSink, ScriptedKeys};
    use crate::draw::GREEN;
    use crate::filter;

    fn stub_source(width: u32, height: u32) -> SyntheticSource {
        let mut source = SyntheticSource::new(CameraConfig {
            device: "stub://test".to_string(),
            width,
            height,
            target_fps: 0,
        });
        source.connect().unwrap();
        source
    }

    struct NoopOp;

    impl FrameOp for NoopOp {
        fn apply(&mut self, _frame: &mut Frame) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn escape_terminates_the_loop() {
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![None, None, Some(Key::Esc)]);

        let stats = run(
            &mut source,
            &mut NoopOp,
            &mut sink,
            &mut keys,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.frames, 3);
        assert_eq!(sink.presented(), 3);
    }

    #[test]
    fn non_escape_keys_do_not_terminate() {
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        // A spread of other keys, then Escape.
        let mut keys = ScriptedKeys::new(vec![
            Some(Key::Char('q')),
            Some(Key::Char(' ')),
            Some(Key::Other),
            Some(Key::Char('\n')),
            Some(Key::Esc),
        ]);

        let stats = run(
            &mut source,
            &mut NoopOp,
            &mut sink,
            &mut keys,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.frames, 5);
    }

    #[test]
    fn frame_cap_stops_a_keyless_run() {
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![]);

        let opts = RunOptions {
            max_frames: Some(4),
            ..RunOptions::default()
        };
        let stats = run(&mut source, &mut NoopOp, &mut sink, &mut keys, &opts).unwrap();
        assert_eq!(stats.frames, 4);
    }

    #[test]
    fn shutdown_flag_stops_the_loop_before_capture() {
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![]);

        let flag = Arc::new(AtomicBool::new(true));
        let opts = RunOptions {
            shutdown: Some(flag),
            ..RunOptions::default()
        };
        let stats = run(&mut source, &mut NoopOp, &mut sink, &mut keys, &opts).unwrap();
        assert_eq!(stats.frames, 0);
        assert_eq!(sink.presented(), 0);
    }

    #[test]
    fn detect_op_draws_one_marker_per_face() {
        let mut source = stub_source(64, 64);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![Some(Key::Esc)]);

        let faces = vec![
            FaceBox::new(8, 8, 10, 10, 0.9),
            FaceBox::new(40, 30, 12, 14, 0.7),
        ];
        let mut op = DetectOp::new(Box::new(StubBackend::fixed(faces.clone())), Marker::Crosshair);

        run(
            &mut source,
            &mut op,
            &mut sink,
            &mut keys,
            &RunOptions::default(),
        )
        .unwrap();

        assert_eq!(op.detections(), 2);
        let shown = sink.last_frame().unwrap();
        for face in &faces {
            let (cx, cy) = face.center();
            assert_eq!(shown.pixel(cx as u32, cy as u32), GREEN);
        }
    }

    #[test]
    fn convolve_op_runs_the_configured_kernel() {
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![Some(Key::Esc)]);

        let mut op = ConvolveOp::new(filter::IDENTITY, false);
        run(
            &mut source,
            &mut op,
            &mut sink,
            &mut keys,
            &RunOptions::default(),
        )
        .unwrap();

        // Identity kernel: the displayed frame equals the captured one.
        let mut fresh = stub_source(16, 16);
        let expected = fresh.next_frame().unwrap();
        assert_eq!(sink.last_frame(), Some(&expected));
    }

    #[test]
    fn snapshot_key_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = stub_source(16, 16);
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![Some(Key::Char('s')), Some(Key::Esc)]);

        let opts = RunOptions {
            snapshot_dir: Some(dir.path().to_path_buf()),
            ..RunOptions::default()
        };
        let stats = run(&mut source, &mut NoopOp, &mut sink, &mut keys, &opts).unwrap();

        assert_eq!(stats.snapshots, 1);
        assert!(dir.path().join("frame_00001.png").exists());
    }
}
