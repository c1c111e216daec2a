//! Test and helper mocks for handpilot_core.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use handpilot_traits::{Landmark, LandmarkSource, Observation, Transport};

use crate::config::FrameCfg;
use crate::geometry::LANDMARK_COUNT;

/// Source that replays a fixed script, then reports `Closed`.
///
/// `Err` entries surface as capture failures.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<Observation, String>>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            script: frames.into_iter().map(Ok).collect(),
        }
    }

    /// Append a capture failure after the scripted frames.
    pub fn then_fail(mut self, msg: &str) -> Self {
        self.script.push_back(Err(msg.to_string()));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Observation, Box<dyn std::error::Error + Send + Sync>> {
        match self.script.pop_front() {
            Some(Ok(obs)) => Ok(obs),
            Some(Err(msg)) => Err(Box::new(std::io::Error::other(msg))),
            None => Ok(Observation::Closed),
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    sent: Vec<(char, u32)>,
    fail_next: u32,
    fail_always: bool,
}

/// Read-side handle on a `RecordingTransport`, usable after the transport
/// has been moved into a pilot.
#[derive(Debug, Clone, Default)]
pub struct TransportLog {
    inner: Arc<Mutex<Shared>>,
}

impl TransportLog {
    /// Accepted `(code, speed)` pairs, in order.
    pub fn sent(&self) -> Vec<(char, u32)> {
        self.inner.lock().map(|g| g.sent.clone()).unwrap_or_default()
    }

    pub fn codes(&self) -> String {
        self.sent().into_iter().map(|(c, _)| c).collect()
    }

    pub fn fail_next(&self, n: u32) {
        if let Ok(mut g) = self.inner.lock() {
            g.fail_next = n;
        }
    }

    pub fn fail_always(&self, on: bool) {
        if let Ok(mut g) = self.inner.lock() {
            g.fail_always = on;
        }
    }
}

/// Transport that records what it accepted and can be told to refuse.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    log: TransportLog,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }

    /// Refuse the next `n` sends.
    pub fn fail_next(&self, n: u32) {
        self.log.fail_next(n);
    }
}

impl Transport for RecordingTransport {
    fn send(
        &mut self,
        code: char,
        speed: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut g = self
            .log
            .inner
            .lock()
            .map_err(|_| std::io::Error::other("transport log poisoned"))?;
        if g.fail_always || g.fail_next > 0 {
            g.fail_next = g.fail_next.saturating_sub(1);
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        g.sent.push((code, speed));
        Ok(())
    }

    fn target(&self) -> String {
        String::from("recording")
    }
}

// ── Synthetic hands ──────────────────────────────────────────────────────────

// Centre of the pixel, so truncation lands back on it.
fn norm(px: i32, extent: u32) -> f32 {
    (px as f32 + 0.5) / extent.max(1) as f32
}

/// 21 landmarks with the wrist, middle base and ring base at the given
/// pixels. Other points sit at the wrist.
pub fn hand_at(
    frame: &FrameCfg,
    wrist: (i32, i32),
    middle_base: (i32, i32),
    ring_base: (i32, i32),
) -> Vec<Landmark> {
    let lm = |(x, y): (i32, i32)| Landmark::new(norm(x, frame.width), norm(y, frame.height), 0.0);
    let mut pts = vec![lm(wrist); LANDMARK_COUNT];
    pts[9] = lm(middle_base);
    pts[13] = lm(ring_base);
    pts
}

/// Upright hand whose palm anchors sit at `(x, y)` and `(x + 20, y)`.
pub fn upright_hand(frame: &FrameCfg, x: i32, y: i32) -> Vec<Landmark> {
    hand_at(frame, (x, y + 120), (x, y), (x + 20, y))
}

/// Hand in the frame centre tilted by `deg` (positive leans right).
pub fn tilted_hand(frame: &FrameCfg, deg: f32) -> Vec<Landmark> {
    let cx = (frame.width / 2) as i32;
    let cy = (frame.height / 2) as i32;
    let (s, c) = deg.to_radians().sin_cos();
    let len = 150.0;
    let wrist = (cx - (len * s).round() as i32, cy + (len * c).round() as i32);
    hand_at(frame, wrist, (cx, cy), (cx + 20, cy))
}
