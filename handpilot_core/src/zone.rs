//! Spatial zones and per-frame gesture classification.
//!
//! Two bands centred horizontally on the frame: the upper band triggers
//! forward, the lower band backward. Both palm anchors (middle- and
//! ring-finger bases) must be strictly inside a band. A tilt beyond the
//! deadzone overrides the zones.

use crate::command::Command;
use crate::config::{FrameCfg, ZoneCfg};
use crate::geometry::PixelPoint;

/// Axis-aligned rectangle with exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub top_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

impl Zone {
    pub const fn new(top_left: PixelPoint, bottom_right: PixelPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Strict containment: points on an edge are outside.
    #[inline]
    pub fn contains(&self, p: PixelPoint) -> bool {
        self.top_left.x < p.x
            && p.x < self.bottom_right.x
            && self.top_left.y < p.y
            && p.y < self.bottom_right.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneLayout {
    pub upper: Zone,
    pub lower: Zone,
}

impl ZoneLayout {
    pub fn new(frame: &FrameCfg, zones: &ZoneCfg) -> Self {
        let cx = i64::from(frame.width) / 2;
        let hw = i64::from(zones.half_width);
        let h = i64::from(frame.height);
        let d = i64::from(zones.depth);
        let px = |x: i64, y: i64| {
            PixelPoint::new(
                x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
                y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            )
        };
        Self {
            upper: Zone::new(px(cx - hw, 0), px(cx + hw, d)),
            lower: Zone::new(px(cx - hw, h - d), px(cx + hw, h)),
        }
    }
}

/// Which way the palm is tilted, if past the deadzone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub command: Command,
    pub turn: Option<Turn>,
}

/// Tilt past the deadzone, or `None` inside it (boundary included).
#[inline]
pub fn turn_for(angle_deg: f32, deadzone_deg: f32) -> Option<Turn> {
    if angle_deg > deadzone_deg {
        Some(Turn::Right)
    } else if angle_deg < -deadzone_deg {
        Some(Turn::Left)
    } else {
        None
    }
}

pub fn classify(
    angle_deg: f32,
    middle_base: PixelPoint,
    ring_base: PixelPoint,
    layout: &ZoneLayout,
    deadzone_deg: f32,
) -> Classification {
    let turn = turn_for(angle_deg, deadzone_deg);
    let command = match turn {
        Some(Turn::Right) => Command::Right,
        Some(Turn::Left) => Command::Left,
        None if layout.upper.contains(middle_base) && layout.upper.contains(ring_base) => {
            Command::Forward
        }
        None if layout.lower.contains(middle_base) && layout.lower.contains(ring_base) => {
            Command::Backward
        }
        None => Command::Stop,
    };
    Classification { command, turn }
}
