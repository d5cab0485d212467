//! Demo configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional JSON file addressed by `CAMLOOP_CONFIG`, and `CAMLOOP_*`
//! environment variables. CLI flags in the binaries override all of them.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::capture::CameraConfig;

pub const DEFAULT_DEVICE: &str = "0";
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_MODEL_PATH: &str = "models/seeta_fd_frontal_v1.0.bin";

#[derive(Debug, Deserialize, Default)]
struct DemoConfigFile {
    camera: Option<CameraConfigFile>,
    model_path: Option<PathBuf>,
    snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    target_fps: Option<u32>,
}

/// Merged configuration shared by both demos.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub camera: CameraConfig,
    /// Cascade model path for the face demo.
    pub model_path: PathBuf,
    /// Snapshot output directory; `None` disables the `s` key.
    pub snapshot_dir: Option<PathBuf>,
}

impl DemoConfig {
    /// Load defaults, the `CAMLOOP_CONFIG` file if set, and env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CAMLOOP_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => DemoConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: DemoConfigFile) -> Self {
        let camera = file.camera.unwrap_or_default();
        Self {
            camera: CameraConfig {
                device: camera.device.unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
                width: camera.width.unwrap_or(DEFAULT_WIDTH),
                height: camera.height.unwrap_or(DEFAULT_HEIGHT),
                target_fps: camera.target_fps.unwrap_or(DEFAULT_FPS),
            },
            model_path: file
                .model_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            snapshot_dir: file.snapshot_dir,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("CAMLOOP_DEVICE") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(model) = std::env::var("CAMLOOP_MODEL") {
            if !model.trim().is_empty() {
                self.model_path = PathBuf::from(model);
            }
        }
        if let Ok(dir) = std::env::var("CAMLOOP_SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.snapshot_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(fps) = std::env::var("CAMLOOP_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("CAMLOOP_FPS must be an integer frame rate"))?;
            self.camera.target_fps = fps;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera size must be non-zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<DemoConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
