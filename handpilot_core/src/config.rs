//! Runtime configuration used by `GesturePilot`.
//!
//! Separate from the TOML-deserialized types in `handpilot_config`; see
//! `conversions` for the bridge.

/// Pixel dimensions of the processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCfg {
    pub width: u32,
    pub height: u32,
    /// Flip landmarks horizontally before anything else. Off by default here:
    /// sources are expected to deliver display-space coordinates unless told
    /// otherwise.
    pub mirror: bool,
}

impl Default for FrameCfg {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            mirror: false,
        }
    }
}

/// Size of the upper (forward) and lower (backward) bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCfg {
    /// Half of the band width, centred on the frame.
    pub half_width: u32,
    /// Band height from the top or bottom edge.
    pub depth: u32,
}

impl Default for ZoneCfg {
    fn default() -> Self {
        Self {
            half_width: 100,
            depth: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureCfg {
    /// Smoothed angle must exceed this (degrees) to count as a turn.
    pub deadzone_deg: f32,
    /// Minimum spacing between two dispatched commands.
    pub cooldown_ms: u64,
    /// Speed sent with every motion command; shutdown always sends 0.
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

/// Everything `GesturePilot` needs besides its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PilotCfg {
    pub frame: FrameCfg,
    pub zones: ZoneCfg,
    pub gesture: GestureCfg,
}
