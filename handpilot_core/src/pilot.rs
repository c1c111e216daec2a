//! The per-frame gesture pipeline (`GesturePilot`).
//!
//! Each step reads one observation and runs, in order: mirror, geometry
//! extraction, angle smoothing, zone/tilt classification, majority vote,
//! emission gate, and dispatch. State only advances on a delivered command,
//! so a refused command is retried on a later frame.

use std::sync::Arc;
use std::time::Duration;

use handpilot_traits::{Clock, Landmark, LandmarkSource, Observation, Transport};

use crate::command::Command;
use crate::config::PilotCfg;
use crate::debounce::Decision;
use crate::dispatch::{DispatchStats, Dispatcher};
use crate::error::{PilotError, Result};
use crate::geometry::{self, LandmarkFrame};
use crate::state::GestureState;
use crate::status::{DispatchOutcome, FrameReport, FrameStatus, HandReport};
use crate::transport_error::map_capture_error;
use crate::zone::{self, ZoneLayout};

/// Pipeline core, generic over its landmark source and transport.
pub struct GesturePilot<S: LandmarkSource, T: Transport> {
    pub(crate) source: S,
    pub(crate) dispatcher: Dispatcher<T>,
    pub(crate) cfg: PilotCfg,
    pub(crate) layout: ZoneLayout,
    pub(crate) state: GestureState,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) frames: u64,
    pub(crate) hand_frames: u64,
    pub(crate) stop_sent: bool,
}

impl<S: LandmarkSource, T: Transport> core::fmt::Debug for GesturePilot<S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GesturePilot")
            .field("frames", &self.frames)
            .field("last_emitted", &self.state.last_emitted())
            .field("dispatcher", &self.dispatcher)
            .field("stop_sent", &self.stop_sent)
            .finish()
    }
}

impl<S: LandmarkSource, T: Transport> GesturePilot<S, T> {
    pub(crate) fn assemble(
        source: S,
        transport: T,
        cfg: PilotCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let started = clock.now();
        Self {
            source,
            dispatcher: Dispatcher::new(transport),
            layout: ZoneLayout::new(&cfg.frame, &cfg.zones),
            state: GestureState::new(started, Duration::from_millis(cfg.gesture.cooldown_ms)),
            cfg,
            clock,
            frames: 0,
            hand_frames: 0,
            stop_sent: false,
        }
    }

    /// Read one observation from the source and process it.
    ///
    /// A capture error is returned as `PilotError::Capture`; the caller is
    /// expected to `shutdown()` (or drop the pilot) afterwards.
    pub fn step(&mut self) -> Result<FrameStatus> {
        self.ensure_running()?;
        let obs = self
            .source
            .next_frame()
            .map_err(|e| eyre::Report::new(map_capture_error(e.as_ref())))?;
        Ok(match obs {
            Observation::Closed => FrameStatus::Closed,
            Observation::NoHand => FrameStatus::Processed(self.process(None)),
            Observation::Hand(points) => FrameStatus::Processed(self.process(Some(points.as_slice()))),
        })
    }

    /// Process landmarks delivered by the caller instead of the source.
    /// `None` or an unusable set is treated as "no hand". Like `step`, this
    /// fails with `PilotError::State` once the final stop has been sent.
    pub fn step_landmarks(&mut self, landmarks: Option<&[Landmark]>) -> Result<FrameReport> {
        self.ensure_running()?;
        Ok(self.process(landmarks))
    }

    fn ensure_running(&self) -> Result<()> {
        if self.stop_sent {
            return Err(eyre::Report::new(PilotError::State(
                "pilot already shut down".into(),
            )));
        }
        Ok(())
    }

    fn process(&mut self, landmarks: Option<&[Landmark]>) -> FrameReport {
        let now = self.clock.now();
        let frame_idx = self.frames;
        self.frames = self.frames.saturating_add(1);

        let detected = landmarks.and_then(LandmarkFrame::from_slice).map(|f| {
            if self.cfg.frame.mirror { f.mirrored() } else { f }
        });

        let (raw_command, turn, hand) = match detected {
            Some(frame) => {
                self.hand_frames = self.hand_frames.saturating_add(1);
                let g = geometry::extract(&frame, &self.cfg.frame);
                let smoothed = self.state.observe_angle(g.raw_angle);
                let cls = zone::classify(
                    smoothed,
                    g.middle_base,
                    g.ring_base,
                    &self.layout,
                    self.cfg.gesture.deadzone_deg,
                );
                if let Some(tips) = g.fingertips {
                    tracing::trace!(
                        frame = frame_idx,
                        index = ?tips.index,
                        middle = ?tips.middle,
                        ring = ?tips.ring,
                        "fingertips relative to wrist"
                    );
                }
                let hand = HandReport {
                    raw_angle: g.raw_angle,
                    smoothed_angle: smoothed,
                    wrist: g.wrist,
                    middle_base: g.middle_base,
                    ring_base: g.ring_base,
                    fingertips: g.fingertips,
                };
                (cls.command, cls.turn, Some(hand))
            }
            // angle history stays frozen while the hand is away
            None => (Command::Stop, None, None),
        };

        self.state.push_command(raw_command);
        let speed = self.cfg.gesture.default_speed;

        let (dispatch, hold) = match self.state.decide(now) {
            Decision::Emit(cmd) => {
                let delivered = self.dispatcher.dispatch(cmd, speed);
                if delivered {
                    self.state.mark_emitted(cmd, now);
                }
                let outcome = DispatchOutcome {
                    command: cmd,
                    speed,
                    delivered,
                };
                (Some(outcome), None)
            }
            Decision::Hold(_, why) => (None, Some(why)),
        };

        let report = FrameReport {
            frame: frame_idx,
            hand,
            raw_command,
            turn,
            majority: self.state.majority(),
            active: self.state.last_emitted(),
            dispatch,
            hold,
            speed,
        };
        tracing::debug!(
            frame = report.frame,
            hand = report.hand.is_some(),
            angle = report.hand.map(|h| h.smoothed_angle),
            raw = report.raw_command.label(),
            majority = report.majority.label(),
            active = report.active.label(),
            "frame"
        );
        report
    }

    /// Send the final stop at speed 0. Runs once; later calls send nothing
    /// and return `false`. Failure is logged, not returned.
    pub fn shutdown(&mut self) -> bool {
        if self.stop_sent {
            return false;
        }
        self.stop_sent = true;
        let ok = self.dispatcher.dispatch(Command::Stop, 0);
        if ok {
            self.state.mark_emitted(Command::Stop, self.clock.now());
        } else {
            tracing::warn!(endpoint = %self.dispatcher.target(), "final stop was not delivered");
        }
        ok
    }

    pub fn is_shut_down(&self) -> bool {
        self.stop_sent
    }

    pub fn last_emitted(&self) -> Command {
        self.state.last_emitted()
    }

    pub fn smoothed_angle(&self) -> Option<f32> {
        self.state.smoothed_angle()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn cfg(&self) -> &PilotCfg {
        &self.cfg
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn hand_frames(&self) -> u64 {
        self.hand_frames
    }

    pub fn target(&self) -> String {
        self.dispatcher.target()
    }

    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }
}

impl<S: LandmarkSource, T: Transport> Drop for GesturePilot<S, T> {
    fn drop(&mut self) {
        if !self.stop_sent {
            self.shutdown();
        }
    }
}
