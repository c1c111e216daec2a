//! Weighted short-window smoothing of the palm angle.

use std::collections::VecDeque;

/// Number of recent angles kept.
pub const ANGLE_WINDOW: usize = 3;

/// Weights applied most-recent first.
pub const ANGLE_WEIGHTS: [f32; ANGLE_WINDOW] = [0.5, 0.3, 0.2];

/// Bounded history of raw palm angles.
///
/// The smoothed value is the weighted mean of what is present, normalized by
/// the weights actually used, so a partly filled window is not biased toward
/// zero. Angles are averaged linearly; the ±180° seam is not unwrapped.
#[derive(Debug, Clone, Default)]
pub struct AngleHistory {
    buf: VecDeque<f32>,
}

impl AngleHistory {
    pub fn new() -> Self {
        Self {
            buf: VecDeque::with_capacity(ANGLE_WINDOW),
        }
    }

    /// Record a raw angle and return the new smoothed value.
    pub fn push(&mut self, angle: f32) -> f32 {
        if self.buf.len() == ANGLE_WINDOW {
            self.buf.pop_front();
        }
        self.buf.push_back(angle);
        // non-empty after push_back
        self.smoothed().unwrap_or(angle)
    }

    /// Weighted mean of the stored angles; `None` before the first push.
    pub fn smoothed(&self) -> Option<f32> {
        if self.buf.is_empty() {
            return None;
        }
        let (sum, weight) = self
            .buf
            .iter()
            .rev()
            .zip(ANGLE_WEIGHTS)
            .fold((0.0_f32, 0.0_f32), |(s, w), (&a, k)| (s + a * k, w + k));
        Some(sum / weight)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Stored angles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.buf.iter()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn empty_history_has_no_value() {
        assert_eq!(AngleHistory::new().smoothed(), None);
    }

    #[test]
    fn single_sample_is_returned_as_is() {
        let mut h = AngleHistory::new();
        assert!(close(h.push(12.5), 12.5));
    }

    #[test]
    fn partial_window_is_renormalized() {
        let mut h = AngleHistory::new();
        h.push(10.0);
        // (0.5*20 + 0.3*10) / 0.8
        assert!(close(h.push(20.0), 16.25));
    }

    #[test]
    fn full_window_weights_most_recent_highest() {
        let mut h = AngleHistory::new();
        h.push(10.0);
        h.push(25.0);
        assert!(close(h.push(40.0), 29.5));
    }

    #[test]
    fn oldest_sample_is_evicted() {
        let mut h = AngleHistory::new();
        for a in [90.0, 10.0, 25.0, 40.0] {
            h.push(a);
        }
        assert_eq!(h.len(), ANGLE_WINDOW);
        assert_eq!(h.iter().copied().collect::<Vec<_>>(), vec![10.0, 25.0, 40.0]);
        assert!(close(h.smoothed().unwrap(), 29.5));
    }
}
