//! Frame pacing helpers.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Frame period in milliseconds for a rate in frames per second.
/// Clamps `fps` to at least 1 and the result to at least 1 ms.
#[inline]
pub fn period_ms(fps: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(fps.max(1))).max(1)
}

/// Pacing interval for `fps`; `None` (run as fast as frames arrive) for 0.
#[inline]
pub fn frame_period(fps: u32) -> Option<Duration> {
    (fps > 0).then(|| Duration::from_millis(period_ms(fps)))
}
