//! Synthetic hand for running the pipeline without a camera.
//!
//! Cycles through a fixed script of poses, holding each for a number of
//! frames. Poses are laid out in pixel space against the configured zone
//! geometry and then normalized, the way a detector would report them.

use handpilot_traits::{Landmark, LandmarkSource, Observation};

use crate::error::IoError;

/// Poses the simulated hand cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Away,
    Neutral,
    Raised,
    TiltRight,
    TiltLeft,
    Lowered,
}

pub const SCRIPT: [Pose; 6] = [
    Pose::Away,
    Pose::Neutral,
    Pose::Raised,
    Pose::TiltRight,
    Pose::TiltLeft,
    Pose::Lowered,
];

const TILT_DEG: f32 = 35.0;

// (across palm, toward fingertips) in units of palm length, relative to the
// middle-finger base. Index order matches the 21-point hand model.
const SKELETON: [(f32, f32); 21] = [
    (0.0, -1.0),     // wrist
    (-0.35, -0.8),   // thumb
    (-0.55, -0.55),
    (-0.7, -0.35),
    (-0.8, -0.15),
    (-0.3, -0.05),   // index
    (-0.32, 0.3),
    (-0.33, 0.55),
    (-0.34, 0.75),
    (0.0, 0.0),      // middle
    (0.0, 0.38),
    (0.0, 0.65),
    (0.0, 0.85),
    (0.25, 0.0),     // ring
    (0.27, 0.33),
    (0.28, 0.58),
    (0.29, 0.78),
    (0.5, -0.15),    // pinky
    (0.53, 0.12),
    (0.55, 0.32),
    (0.56, 0.48),
];

#[derive(Debug, Clone)]
pub struct SimulatedHand {
    width: f32,
    height: f32,
    zone_depth: f32,
    hold_frames: u64,
    mirror: bool,
    frame: u64,
    fail_after: Option<u64>,
}

impl SimulatedHand {
    pub fn new(width: u32, height: u32, zone_depth: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            zone_depth: zone_depth.max(1) as f32,
            hold_frames: 20,
            mirror: false,
            frame: 0,
            fail_after: None,
        }
    }

    /// Frames each pose is held for.
    pub fn with_hold(mut self, frames: u64) -> Self {
        self.hold_frames = frames.max(1);
        self
    }

    /// Emit camera-space coordinates that come out as the scripted pose after
    /// the pipeline's horizontal mirror.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Simulate a capture failure once `frames` frames were produced.
    pub fn fail_after(mut self, frames: Option<u64>) -> Self {
        self.fail_after = frames;
        self
    }

    pub fn pose_at(&self, frame: u64) -> Pose {
        let idx = (frame / self.hold_frames) as usize % SCRIPT.len();
        SCRIPT[idx]
    }

    /// Hand landmarks with the middle-finger base at pixel (`cx`, `cy`).
    fn landmarks(&self, cx: f32, cy: f32, tilt_deg: f32) -> Vec<Landmark> {
        let palm = self.zone_depth * 0.6;
        let (s, c) = tilt_deg.to_radians().sin_cos();
        // u points across the palm, v from the wrist toward the fingertips
        let (ux, uy) = (c, s);
        let (vx, vy) = (s, -c);
        SKELETON
            .iter()
            .map(|&(a, b)| {
                let px = cx + palm * (a * ux + b * vx);
                let py = cy + palm * (a * uy + b * vy);
                let mut x = px / self.width;
                if self.mirror {
                    x = 1.0 - x;
                }
                Landmark::new(x, py / self.height, 0.0)
            })
            .collect()
    }

    fn observe(&self, frame: u64) -> Observation {
        let cx = self.width / 2.0;
        // small wobble so smoothing has something to do
        let wobble = 3.0 * (frame as f32 * 0.7).sin();
        match self.pose_at(frame) {
            Pose::Away => Observation::NoHand,
            Pose::Neutral => Observation::Hand(self.landmarks(cx, self.height / 2.0, wobble)),
            Pose::Raised => Observation::Hand(self.landmarks(cx, self.zone_depth / 2.0, wobble)),
            Pose::Lowered => Observation::Hand(self.landmarks(
                cx,
                self.height - self.zone_depth / 2.0,
                wobble,
            )),
            Pose::TiltRight => {
                Observation::Hand(self.landmarks(cx, self.height / 2.0, TILT_DEG + wobble))
            }
            Pose::TiltLeft => {
                Observation::Hand(self.landmarks(cx, self.height / 2.0, -TILT_DEG + wobble))
            }
        }
    }
}

impl LandmarkSource for SimulatedHand {
    fn next_frame(&mut self) -> Result<Observation, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(limit) = self.fail_after
            && self.frame >= limit
        {
            return Err(Box::new(IoError::Capture(format!(
                "simulated camera stopped after {limit} frames"
            ))));
        }
        let obs = self.observe(self.frame);
        self.frame = self.frame.saturating_add(1);
        Ok(obs)
    }
}
