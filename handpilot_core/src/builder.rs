//! Type-state builder for `Pilot` and generic `build_pilot` constructor.
//!
//! `build()` is only available once a source and a transport are set;
//! `try_build()` is always available and reports what is missing.

use std::marker::PhantomData;
use std::sync::Arc;

use handpilot_traits::{Clock, LandmarkSource, MonotonicClock, Transport};

use crate::config::{FrameCfg, GestureCfg, PilotCfg, ZoneCfg};
use crate::pilot::GesturePilot;
use crate::error::{BuildError, Result};

/// Boxed pilot for callers that pick collaborators at runtime.
pub type Pilot = GesturePilot<Box<dyn LandmarkSource>, Box<dyn Transport>>;

impl Pilot {
    /// Start building a Pilot.
    pub fn builder() -> PilotBuilder<Missing, Missing> {
        PilotBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Pilot`. Configuration is validated on `build()`.
pub struct PilotBuilder<S, T> {
    source: Option<Box<dyn LandmarkSource>>,
    transport: Option<Box<dyn Transport>>,
    frame: Option<FrameCfg>,
    zones: Option<ZoneCfg>,
    gesture: Option<GestureCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
    _t: PhantomData<T>,
}

impl Default for PilotBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            source: None,
            transport: None,
            frame: None,
            zones: None,
            gesture: None,
            clock: None,
            _s: PhantomData,
            _t: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate configuration; shared by the builder and `build_pilot`.
fn validate(cfg: &PilotCfg) -> Result<()> {
    let PilotCfg {
        frame,
        zones,
        gesture,
    } = cfg;
    if frame.width == 0 || frame.height == 0 {
        return Err(invalid("frame dimensions must be > 0"));
    }
    if frame.width > i32::MAX as u32 || frame.height > i32::MAX as u32 {
        return Err(invalid("frame dimensions too large"));
    }
    if zones.half_width == 0 || zones.depth == 0 {
        return Err(invalid("zone size must be > 0"));
    }
    if u64::from(zones.half_width) * 2 > u64::from(frame.width) {
        return Err(invalid("zone half_width wider than the frame"));
    }
    if u64::from(zones.depth) * 2 > u64::from(frame.height) {
        return Err(invalid("zone depth deeper than half the frame"));
    }
    if !gesture.deadzone_deg.is_finite() || !(0.0..180.0).contains(&gesture.deadzone_deg) {
        return Err(invalid("deadzone_deg must be in [0, 180)"));
    }
    if gesture.default_speed == 0 {
        return Err(invalid("default_speed must be > 0"));
    }
    Ok(())
}

fn build_checked<S: LandmarkSource, T: Transport>(
    source: S,
    transport: T,
    cfg: PilotCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<GesturePilot<S, T>> {
    validate(&cfg)?;
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let pilot = GesturePilot::assemble(source, transport, cfg, clock);
    tracing::debug!(
        width = cfg.frame.width,
        height = cfg.frame.height,
        mirror = cfg.frame.mirror,
        deadzone_deg = cfg.gesture.deadzone_deg,
        cooldown_ms = cfg.gesture.cooldown_ms,
        endpoint = %pilot.target(),
        "pilot ready"
    );
    Ok(pilot)
}

impl<S, T> PilotBuilder<S, T> {
    /// Fallible build available in any type-state.
    pub fn try_build(self) -> Result<Pilot> {
        let source = self
            .source
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSource))?;
        let transport = self
            .transport
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTransport))?;
        let cfg = PilotCfg {
            frame: self.frame.unwrap_or_default(),
            zones: self.zones.unwrap_or_default(),
            gesture: self.gesture.unwrap_or_default(),
        };
        build_checked(source, transport, cfg, self.clock)
    }
}

/// Chainable setters that do not affect type-state.
impl<S, T> PilotBuilder<S, T> {
    pub fn with_frame(mut self, frame: FrameCfg) -> Self {
        self.frame = Some(frame);
        self
    }
    pub fn with_zones(mut self, zones: ZoneCfg) -> Self {
        self.zones = Some(zones);
        self
    }
    pub fn with_gesture(mut self, gesture: GestureCfg) -> Self {
        self.gesture = Some(gesture);
        self
    }
    pub fn with_config(self, cfg: PilotCfg) -> Self {
        self.with_frame(cfg.frame)
            .with_zones(cfg.zones)
            .with_gesture(cfg.gesture)
    }
    /// Provide a custom clock; defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<T> PilotBuilder<Missing, T> {
    pub fn with_source(self, source: impl LandmarkSource + 'static) -> PilotBuilder<Set, T> {
        PilotBuilder {
            source: Some(Box::new(source)),
            transport: self.transport,
            frame: self.frame,
            zones: self.zones,
            gesture: self.gesture,
            clock: self.clock,
            _s: PhantomData,
            _t: PhantomData,
        }
    }
}

impl<S> PilotBuilder<S, Missing> {
    pub fn with_transport(self, transport: impl Transport + 'static) -> PilotBuilder<S, Set> {
        PilotBuilder {
            source: self.source,
            transport: Some(Box::new(transport)),
            frame: self.frame,
            zones: self.zones,
            gesture: self.gesture,
            clock: self.clock,
            _s: PhantomData,
            _t: PhantomData,
        }
    }
}

impl PilotBuilder<Set, Set> {
    /// Validate and build. Only available when source and transport are set.
    pub fn build(self) -> Result<Pilot> {
        self.try_build()
    }
}

/// Build a statically-dispatched pilot from concrete collaborators.
pub fn build_pilot<S, T>(
    source: S,
    transport: T,
    cfg: PilotCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<GesturePilot<S, T>>
where
    S: LandmarkSource,
    T: Transport,
{
    build_checked(source, transport, cfg, clock)
}
