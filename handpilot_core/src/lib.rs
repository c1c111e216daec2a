#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Gesture-to-command pipeline (camera- and vehicle-agnostic).
//!
//! Hand landmarks come in through `handpilot_traits::LandmarkSource` and
//! commands leave through `handpilot_traits::Transport`; everything in
//! between lives here.
//!
//! ## Pipeline
//!
//! - **Geometry**: palm orientation and zone anchors in pixels (`geometry`)
//! - **Smoothing**: weighted mean of the last three angles (`smoother`)
//! - **Classification**: tilt deadzone, then forward/backward bands (`zone`)
//! - **Debounce**: majority of the last three raw commands plus a cooldown gate (`debounce`)
//! - **Dispatch**: serialized sends; state advances only on delivery (`dispatch`)
//! - **Loop**: frame pacing, frame limit, shutdown flag, final stop (`runner`)

pub mod builder;
pub mod command;
pub mod config;
pub mod conversions;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod mocks;
pub mod pilot;
pub mod runner;
pub mod smoother;
pub mod state;
pub mod status;
pub mod transport_error;
pub mod util;
pub mod zone;

pub use builder::{Missing, Pilot, PilotBuilder, Set, build_pilot};
pub use command::Command;
pub use config::{FrameCfg, GestureCfg, PilotCfg, ZoneCfg};
pub use dispatch::{DispatchStats, Dispatcher};
pub use error::{BuildError, PilotError, Report, Result};
pub use pilot::GesturePilot;
pub use runner::{RunEnd, RunParams, RunSummary, run};
pub use status::{DispatchOutcome, FrameReport, FrameStatus, HandReport};
pub use zone::Turn;
