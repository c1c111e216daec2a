//! `From` implementations bridging `handpilot_config` types to `handpilot_core` types.

use crate::config::{FrameCfg, GestureCfg, PilotCfg, ZoneCfg};

// ── FrameCfg ─────────────────────────────────────────────────────────────────

impl From<&handpilot_config::FrameCfg> for FrameCfg {
    fn from(c: &handpilot_config::FrameCfg) -> Self {
        Self {
            width: c.width,
            height: c.height,
            mirror: c.mirror,
        }
    }
}

// ── ZoneCfg ──────────────────────────────────────────────────────────────────

impl From<&handpilot_config::ZonesCfg> for ZoneCfg {
    fn from(c: &handpilot_config::ZonesCfg) -> Self {
        Self {
            half_width: c.half_width,
            depth: c.depth,
        }
    }
}

// ── GestureCfg ───────────────────────────────────────────────────────────────

impl From<&handpilot_config::GestureCfg> for GestureCfg {
    fn from(c: &handpilot_config::GestureCfg) -> Self {
        Self {
            deadzone_deg: c.deadzone_deg,
            cooldown_ms: c.cooldown_ms,
            default_speed: c.default_speed,
        }
    }
}

// ── PilotCfg ─────────────────────────────────────────────────────────────────

impl From<&handpilot_config::Config> for PilotCfg {
    fn from(c: &handpilot_config::Config) -> Self {
        Self {
            frame: (&c.frame).into(),
            zones: (&c.zones).into(),
            gesture: (&c.gesture).into(),
        }
    }
}
