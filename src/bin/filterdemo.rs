//! filterdemo - live camera feed through a fixed 3x3 convolution kernel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use camloop::{
    open_source, runloop, ConvolveOp, DemoConfig, KernelChoice, NullSink, RunOptions,
    ScriptedKeys, TermKeys, TermWindow,
};

const WINDOW_TITLE: &str = "filterdemo";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera device: index ("0"), node path, or stub://name.
    #[arg(long)]
    device: Option<String>,
    /// Preferred capture width.
    #[arg(long)]
    width: Option<u32>,
    /// Preferred capture height.
    #[arg(long)]
    height: Option<u32>,
    /// Kernel to apply: emboss, gaussian, or identity.
    #[arg(long, default_value = "emboss")]
    kernel: KernelChoice,
    /// Convert the frame to grayscale before filtering.
    #[arg(long)]
    gray: bool,
    /// Run headless for N frames instead of opening a window.
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = DemoConfig::load()?;
    if let Some(device) = args.device {
        cfg.camera.device = device;
    }
    if let Some(width) = args.width {
        cfg.camera.width = width;
    }
    if let Some(height) = args.height {
        cfg.camera.height = height;
    }

    let mut source = open_source(&cfg.camera)?;
    source.connect()?;
    let (width, height) = source.active_size();
    log::info!(
        "filterdemo: {} at {}x{}, kernel {}",
        cfg.camera.device,
        width,
        height,
        args.kernel
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
    let mut op = ConvolveOp::new(args.kernel.kernel(), args.gray);

    let stats = if args.frames.is_some() {
        let mut sink = NullSink::new();
        let mut keys = ScriptedKeys::new(vec![]);
        runloop::run(source.as_mut(), &mut op, &mut sink, &mut keys, &opts)?
    } else {
        let mut window = TermWindow::open(WINDOW_TITLE)?;
        let mut keys = TermKeys;
        runloop::run(source.as_mut(), &mut op, &mut window, &mut keys, &opts)?
    };

    println!("filterdemo summary:");
    println!("  frames processed: {}", stats.frames);
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
