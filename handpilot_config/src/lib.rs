#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and landmark replay parsing for the gesture pilot.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config.
//! - The landmark replay CSV loader enforces headers and frame ordering.
use serde::Deserialize;

/// Where commands are sent.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransportCfg {
    /// Control endpoint; `command` and `speed` are appended as query parameters.
    pub base_url: String,
    /// Per-request timeout (ms).
    pub timeout_ms: u64,
}

impl Default for TransportCfg {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.29.100/control".to_string(),
            timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FrameCfg {
    pub width: u32,
    pub height: u32,
    /// Flip landmarks horizontally (selfie view) before classification.
    pub mirror: bool,
}

impl Default for FrameCfg {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            mirror: true,
        }
    }
}

/// Size of the forward/backward trigger zones, in pixels.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ZonesCfg {
    /// Horizontal distance from the frame center to either zone edge.
    pub half_width: u32,
    /// Vertical extent of each zone from the top/bottom frame edge.
    pub depth: u32,
}

impl Default for ZonesCfg {
    fn default() -> Self {
        Self {
            half_width: 100,
            depth: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct GestureCfg {
    /// Tilt beyond +/- this many degrees is a turn.
    pub deadzone_deg: f32,
    /// Minimum time between two emitted commands (ms).
    pub cooldown_ms: u64,
    /// Speed sent along with every regular command.
    pub default_speed: u32,
}

impl Default for GestureCfg {
    fn default() -> Self {
        Self {
            deadzone_deg: 20.0,
            cooldown_ms: 50,
            default_speed: 160,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SourceCfg {
    /// Pacing for simulated and replayed sources; 0 runs unpaced.
    pub fps: u32,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub transport: TransportCfg,
    pub frame: FrameCfg,
    pub zones: ZonesCfg,
    pub gesture: GestureCfg,
    pub source: SourceCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Transport
        let url = self.transport.base_url.trim();
        if url.is_empty() {
            eyre::bail!("transport.base_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            eyre::bail!("transport.base_url must start with http:// or https://");
        }
        if self.transport.timeout_ms == 0 {
            eyre::bail!("transport.timeout_ms must be >= 1");
        }
        if self.transport.timeout_ms > 60_000 {
            eyre::bail!("transport.timeout_ms is unreasonably large (>60s)");
        }

        // Frame
        if self.frame.width == 0 || self.frame.height == 0 {
            eyre::bail!("frame.width and frame.height must be > 0");
        }

        // Zones
        if self.zones.half_width == 0 || self.zones.depth == 0 {
            eyre::bail!("zones.half_width and zones.depth must be > 0");
        }
        if u64::from(self.zones.half_width) * 2 > u64::from(self.frame.width) {
            eyre::bail!("zones.half_width does not fit inside frame.width");
        }
        if u64::from(self.zones.depth) * 2 > u64::from(self.frame.height) {
            eyre::bail!("zones.depth does not fit inside frame.height");
        }

        // Gesture
        let dz = self.gesture.deadzone_deg;
        if !dz.is_finite() || !(0.0..180.0).contains(&dz) {
            eyre::bail!("gesture.deadzone_deg must be in [0, 180)");
        }
        if self.gesture.default_speed == 0 {
            eyre::bail!("gesture.default_speed must be > 0");
        }
        if self.gesture.cooldown_ms > 60_000 {
            eyre::bail!("gesture.cooldown_ms is unreasonably large (>60s)");
        }

        // Source
        if self.source.fps > 240 {
            eyre::bail!("source.fps must be <= 240");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r:?}");
        }

        Ok(())
    }
}

/// Landmark replay CSV schema.
///
/// Expected headers:
/// frame,landmark,x,y,z
///
/// One row per landmark. A row with an empty `landmark` column records a frame
/// in which no hand was detected:
/// frame,landmark,x,y,z
/// 0,,,,
/// 1,0,0.52,0.81,0.0
/// 1,1,0.55,0.77,-0.01
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LandmarkRow {
    pub frame: u64,
    pub landmark: Option<usize>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// One replayed video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub frame: u64,
    /// `None` when no hand was detected in this frame.
    pub landmarks: Option<Vec<[f32; 3]>>,
}

impl ReplayFrame {
    fn empty(frame: u64) -> Self {
        Self {
            frame,
            landmarks: None,
        }
    }
}

/// Group rows into frames, checking ordering and landmark indices.
pub fn frames_from_rows(rows: &[LandmarkRow]) -> eyre::Result<Vec<ReplayFrame>> {
    let mut frames: Vec<ReplayFrame> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let line = i + 2;
        let start_new = match frames.last() {
            None => true,
            Some(last) if row.frame < last.frame => {
                eyre::bail!(
                    "replay frames must be non-decreasing (line {line}: frame {} after {})",
                    row.frame,
                    last.frame
                );
            }
            Some(last) => row.frame != last.frame,
        };
        if start_new {
            frames.push(ReplayFrame::empty(row.frame));
        }
        let Some(current) = frames.last_mut() else {
            eyre::bail!("internal: no current frame at line {line}");
        };

        match row.landmark {
            None => {
                if current.landmarks.is_some() {
                    eyre::bail!(
                        "frame {} mixes a no-hand row with landmark rows (line {line})",
                        row.frame
                    );
                }
            }
            Some(idx) => {
                let (Some(x), Some(y)) = (row.x, row.y) else {
                    eyre::bail!("landmark row without x/y at line {line}");
                };
                let points = current.landmarks.get_or_insert_with(Vec::new);
                if idx != points.len() {
                    eyre::bail!(
                        "frame {} expected landmark {} but found {idx} (line {line})",
                        row.frame,
                        points.len()
                    );
                }
                points.push([x, y, row.z.unwrap_or(0.0)]);
            }
        }
    }
    Ok(frames)
}

pub fn load_landmark_csv(path: &std::path::Path) -> eyre::Result<Vec<ReplayFrame>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open landmark CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["frame", "landmark", "x", "y", "z"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "landmark CSV must have headers 'frame,landmark,x,y,z', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<LandmarkRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    frames_from_rows(&rows)
}
