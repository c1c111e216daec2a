//! Replays recorded landmark frames as a `LandmarkSource`.

use std::collections::VecDeque;
use std::path::Path;

use handpilot_config::ReplayFrame;
use handpilot_traits::{Landmark, LandmarkSource, Observation};

#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: VecDeque<ReplayFrame>,
}

impl ReplaySource {
    pub fn from_frames(frames: Vec<ReplayFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Load a landmark CSV (see `handpilot_config::load_landmark_csv`).
    pub fn open(path: &Path) -> eyre::Result<Self> {
        let frames = handpilot_config::load_landmark_csv(path)?;
        tracing::info!(path = %path.display(), frames = frames.len(), "replay loaded");
        Ok(Self::from_frames(frames))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Observation, Box<dyn std::error::Error + Send + Sync>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(Observation::Closed);
        };
        Ok(match frame.landmarks {
            Some(points) => Observation::Hand(
                points
                    .into_iter()
                    .map(|[x, y, z]| Landmark::new(x, y, z))
                    .collect(),
            ),
            None => Observation::NoHand,
        })
    }
}
