#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A config that never pauses between frames and never holds a command back.
pub fn write_config(dir: &TempDir, base_url: &str, timeout_ms: u64) -> PathBuf {
    let toml = format!(
        r#"
[transport]
base_url = "{base_url}"
timeout_ms = {timeout_ms}

[frame]
width = 1280
height = 720
mirror = false

[gesture]
cooldown_ms = 0

[source]
fps = 0
"#
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

pub fn write_sim_config(dir: &TempDir) -> PathBuf {
    write_config(dir, "http://127.0.0.1:9/control", 200)
}

/// Replay with one empty frame followed by `hands` frames of an upright hand
/// inside the upper zone.
pub fn write_forward_replay(dir: &TempDir, hands: u32) -> PathBuf {
    let mut csv = String::from("frame,landmark,x,y,z\n0,,,,\n");
    for frame in 1..=hands {
        for idx in 0..14 {
            let (x, y) = match idx {
                0 => (0.5, 0.4),
                9 => (0.5, 0.15),
                13 => (0.52, 0.15),
                _ => (0.5, 0.3),
            };
            writeln!(csv, "{frame},{idx},{x},{y},0").unwrap();
        }
    }
    let path = dir.path().join("hand.csv");
    fs::write(&path, csv).unwrap();
    path
}
