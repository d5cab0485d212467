use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use camloop::config::DemoConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "CAMLOOP_CONFIG",
        "CAMLOOP_DEVICE",
        "CAMLOOP_MODEL",
        "CAMLOOP_SNAPSHOT_DIR",
        "CAMLOOP_FPS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "camera": {
            "device": "/dev/video3",
            "width": 800,
            "height": 600,
            "target_fps": 15
        },
        "model_path": "cascade/frontal.bin",
        "snapshot_dir": "shots"
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("CAMLOOP_CONFIG", file.path());
    std::env::set_var("CAMLOOP_DEVICE", "stub://override");
    std::env::set_var("CAMLOOP_FPS", "5");

    let cfg = DemoConfig::load().expect("load config");

    // Env wins over the file.
    assert_eq!(cfg.camera.device, "stub://override");
    assert_eq!(cfg.camera.target_fps, 5);
    // File wins over defaults.
    assert_eq!(cfg.camera.width, 800);
    assert_eq!(cfg.camera.height, 600);
    assert_eq!(cfg.model_path, PathBuf::from("cascade/frontal.bin"));
    assert_eq!(cfg.snapshot_dir, Some(PathBuf::from("shots")));

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = DemoConfig::load().expect("load config");
    assert_eq!(cfg.camera.device, "0");
    assert_eq!(cfg.camera.width, 640);
    assert_eq!(cfg.camera.height, 480);
    assert_eq!(
        cfg.model_path,
        PathBuf::from("models/seeta_fd_frontal_v1.0.bin")
    );
    assert_eq!(cfg.snapshot_dir, None);
}

#[test]
fn rejects_non_numeric_fps() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CAMLOOP_FPS", "fast");
    let err = DemoConfig::load().unwrap_err();
    assert!(err.to_string().contains("CAMLOOP_FPS"));

    clear_env();
}

#[test]
fn rejects_invalid_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, b"not json").expect("write config");
    std::env::set_var("CAMLOOP_CONFIG", file.path());

    let err = DemoConfig::load().unwrap_err();
    assert!(err.to_string().contains("invalid config file"));

    clear_env();
}
