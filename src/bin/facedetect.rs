//! facedetect - live face detection with a crosshair overlay
//!
//! Loads a pretrained SeetaFace cascade model, runs it on every captured
//! frame, and marks each detection. The model path must point at a valid
//! model file; startup fails otherwise.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;

use camloop::{
    open_source, runloop, DemoConfig, DetectOp, DetectorParams, FaceBox, FaceDetector, Marker,
    NullSink, RunOptions, ScriptedKeys, SeetaBackend, StubBackend, TermKeys, TermWindow,
};

const WINDOW_TITLE: &str = "FaceDetect";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera device: index ("0"), node path, or stub://name.
    #[arg(long)]
    device: Option<String>,
    /// Preferred capture width.
    #[arg(long, default_value_t = 320)]
    width: u32,
    /// Preferred capture height.
    #[arg(long, default_value_t = 240)]
    height: u32,
    /// Cascade model file (overrides config and CAMLOOP_MODEL).
    #[arg(long)]
    model: Option<PathBuf>,
    /// Detector backend: seeta, or stub for a hardware-free smoke run.
    #[arg(long, default_value = "seeta")]
    backend: String,
    /// Smallest face edge to report, in pixels.
    #[arg(long, default_value_t = 20)]
    min_face_size: u32,
    /// Detector score threshold.
    #[arg(long, default_value_t = 2.0)]
    score_thresh: f64,
    /// Detection marker: crosshair or box.
    #[arg(long, default_value = "crosshair")]
    draw: Marker,
    /// Run headless for N frames instead of opening a window.
    #[arg(long)]
    frames: Option<u64>,
}

fn build_backend(args: &Args, cfg: &DemoConfig) -> Result<Box<dyn FaceDetector>> {
    match args.backend.as_str() {
        "seeta" => {
            let params = DetectorParams {
                min_face_size: args.min_face_size,
                score_thresh: args.score_thresh,
                ..DetectorParams::default()
            };
            let model_path = args.model.clone().unwrap_or_else(|| cfg.model_path.clone());
            let backend = SeetaBackend::from_model_file(&model_path, params)?;
            log::info!(
                "facedetect: loaded cascade model {} (min face {}px)",
                model_path.display(),
                backend.params().min_face_size
            );
            Ok(Box::new(backend))
        }
        // One fixed detection in the upper-left quadrant, enough to see
        // the overlay path work without a model or a camera.
        "stub" => Ok(Box::new(StubBackend::fixed(vec![FaceBox::new(
            (args.width / 8) as i32,
            (args.height / 8) as i32,
            args.width / 4,
            args.height / 4,
            1.0,
        )]))),
        other => Err(anyhow!("unknown backend '{}' (expected seeta or stub)", other)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = DemoConfig::load()?;
    if let Some(device) = args.device.clone() {
        cfg.camera.device = device;
    }
    cfg.camera.width = args.width;
    cfg.camera.height = args.height;

    let backend = build_backend(&args, &cfg)?;

    let mut source = open_source(&cfg.camera)?;
    source.connect()?;
    let (width, height) = source.active_size();
    log::info!(
        "facedetect: {} at {}x{}, backend {}",
        cfg.camera.device,
        width,
        height,
        args.backend
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;
    }

    let opts = RunOptions {
        max_frames: args.frames,
        shutdown: Some(shutdown),
        snapshot_dir: cfg.snapshot_dir.clone(),
    };
    let mut op = DetectOp::new(backend, args.draw);

    let stats = if args.frames.is_some() {
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![]);
        runloop::run(source.as_mut(), &mut op, &mut sink, &mut keys, &opts)?
    } else {
        let mut window = TermWindow::open(WINDOW_TITLE)?;
        let mut keys = TermKeys;
        runloop::run(source.as_mut(), &mut op, &mut window, &mut keys, &opts)?
    };

    println!("facedetect summary:");
    println!("  frames processed: {}", stats.frames);
    println!("  faces detected: {}", op.detections());
    println!(
        "  elapsed: {:.2}s ({:.1} fps)",
        stats.elapsed.as_secs_f64(),
        stats.fps()
    );
    if stats.snapshots > 0 {
        println!("  snapshots written: {}", stats.snapshots);
    }
    Ok(())
}
