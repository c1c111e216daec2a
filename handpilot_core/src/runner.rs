//! Frame loop: pulls frames until the source closes, a frame limit is hit,
//! or shutdown is requested, then sends the final stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use handpilot_traits::{LandmarkSource, Transport};

use crate::command::Command;
use crate::pilot::GesturePilot;
use crate::dispatch::DispatchStats;
use crate::error::Result;
use crate::status::{FrameReport, FrameStatus};

/// How a run loop is driven.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunParams {
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    /// Target spacing between frames; `None` runs as fast as frames arrive.
    pub frame_period: Option<Duration>,
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// The source reported no more frames.
    SourceClosed,
    /// The shutdown flag was raised.
    Interrupted,
    /// `max_frames` was reached.
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub end: RunEnd,
    pub frames: u64,
    pub hand_frames: u64,
    pub dispatch: DispatchStats,
    /// Whether the final stop reached the vehicle.
    pub final_stop_delivered: bool,
    /// Last command the vehicle accepted before the final stop.
    pub last_command: Command,
}

/// Drive `pilot` until the source closes, `max_frames` is reached or
/// `shutdown` is raised. The final stop is always attempted, including when a
/// capture error is returned.
pub fn run<S, T, F>(
    pilot: &mut GesturePilot<S, T>,
    params: RunParams,
    shutdown: &AtomicBool,
    mut on_frame: F,
) -> Result<RunSummary>
where
    S: LandmarkSource,
    T: Transport,
    F: FnMut(&FrameReport),
{
    let clock = pilot.clock().clone();
    let mut last_command = pilot.last_emitted();
    let end = loop {
        if shutdown.load(Ordering::Relaxed) {
            break RunEnd::Interrupted;
        }
        if params.max_frames.is_some_and(|max| pilot.frames() >= max) {
            break RunEnd::FrameLimit;
        }
        let t0 = clock.now();
        match pilot.step() {
            Ok(FrameStatus::Processed(report)) => {
                last_command = report.active;
                on_frame(&report);
            }
            Ok(FrameStatus::Closed) => break RunEnd::SourceClosed,
            Err(e) => {
                tracing::error!(error = %e, frames = pilot.frames(), "capture failed; stopping");
                pilot.shutdown();
                return Err(e);
            }
        }
        if let Some(period) = params.frame_period {
            let spent = clock.now().saturating_duration_since(t0);
            if let Some(rest) = period.checked_sub(spent) {
                clock.sleep(rest);
            }
        }
    };

    let final_stop_delivered = pilot.shutdown();
    let summary = RunSummary {
        end,
        frames: pilot.frames(),
        hand_frames: pilot.hand_frames(),
        dispatch: pilot.dispatch_stats(),
        final_stop_delivered,
        last_command,
    };
    tracing::info!(
        end = ?summary.end,
        frames = summary.frames,
        hand_frames = summary.hand_frames,
        delivered = summary.dispatch.delivered,
        failed = summary.dispatch.failed,
        "run finished"
    );
    Ok(summary)
}
