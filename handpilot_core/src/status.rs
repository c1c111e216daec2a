//! What a single pipeline iteration produced.

use crate::command::Command;
use crate::debounce::Hold;
use crate::geometry::{FingertipOffsets, PixelPoint};
use crate::zone::Turn;

/// Result of one `GesturePilot::step`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    /// A frame was processed (with or without a hand).
    Processed(FrameReport),
    /// The source has no more frames.
    Closed,
}

/// Hand measurements for a frame in which a hand was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReport {
    pub raw_angle: f32,
    pub smoothed_angle: f32,
    pub wrist: PixelPoint,
    pub middle_base: PixelPoint,
    pub ring_base: PixelPoint,
    pub fingertips: Option<FingertipOffsets>,
}

/// An attempted dispatch and whether the vehicle accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub command: Command,
    pub speed: u32,
    pub delivered: bool,
}

/// Per-frame summary for overlays and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame counter for this session.
    pub frame: u64,
    pub hand: Option<HandReport>,
    /// Classification before debouncing.
    pub raw_command: Command,
    pub turn: Option<Turn>,
    /// Majority of the recent raw commands.
    pub majority: Command,
    /// Last command the vehicle accepted, after this frame.
    pub active: Command,
    pub dispatch: Option<DispatchOutcome>,
    pub hold: Option<Hold>,
    /// Speed that goes with motion commands.
    pub speed: u32,
}

impl FrameReport {
    pub fn delivered(&self) -> Option<Command> {
        self.dispatch.filter(|d| d.delivered).map(|d| d.command)
    }
}
