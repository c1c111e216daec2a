//! Per-session gesture state: histories plus the last dispatched command.

use std::time::{Duration, Instant};

use crate::command::Command;
use crate::debounce::{self, CommandHistory, Decision};
use crate::smoother::AngleHistory;

/// Mutable state carried from frame to frame.
///
/// Starts as if `Stop` had been emitted at session start, so a session
/// never opens with a stop and the first motion waits one cooldown.
#[derive(Debug, Clone)]
pub struct GestureState {
    angles: AngleHistory,
    commands: CommandHistory,
    last_emitted: Command,
    last_emitted_at: Instant,
    cooldown: Duration,
}

impl GestureState {
    pub fn new(started: Instant, cooldown: Duration) -> Self {
        Self {
            angles: AngleHistory::new(),
            commands: CommandHistory::new(),
            last_emitted: Command::Stop,
            last_emitted_at: started,
            cooldown,
        }
    }

    /// Record a raw angle, returning the smoothed one.
    pub fn observe_angle(&mut self, raw_deg: f32) -> f32 {
        self.angles.push(raw_deg)
    }

    /// Smoothed angle of the last frames that had a hand.
    pub fn smoothed_angle(&self) -> Option<f32> {
        self.angles.smoothed()
    }

    pub fn push_command(&mut self, raw: Command) {
        self.commands.push(raw);
    }

    pub fn majority(&self) -> Command {
        self.commands.majority().unwrap_or(self.last_emitted)
    }

    pub fn decide(&self, now: Instant) -> Decision {
        debounce::gate(
            self.majority(),
            self.last_emitted,
            self.last_emitted_at,
            self.cooldown,
            now,
        )
    }

    /// Only call after the vehicle accepted `cmd`.
    pub fn mark_emitted(&mut self, cmd: Command, at: Instant) {
        self.last_emitted = cmd;
        self.last_emitted_at = at;
    }

    pub fn last_emitted(&self) -> Command {
        self.last_emitted
    }

    pub fn last_emitted_at(&self) -> Instant {
        self.last_emitted_at
    }

    pub fn angles(&self) -> &AngleHistory {
        &self.angles
    }

    pub fn commands(&self) -> &CommandHistory {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_stopped_and_waits_one_cooldown() {
        let t0 = Instant::now();
        let mut s = GestureState::new(t0, Duration::from_millis(50));
        assert_eq!(s.last_emitted(), Command::Stop);
        s.push_command(Command::Forward);
        assert!(matches!(
            s.decide(t0 + Duration::from_millis(10)),
            Decision::Hold(Command::Forward, _)
        ));
        assert_eq!(
            s.decide(t0 + Duration::from_millis(60)),
            Decision::Emit(Command::Forward)
        );
    }

    #[test]
    fn mark_emitted_resets_the_gate() {
        let t0 = Instant::now();
        let mut s = GestureState::new(t0, Duration::from_millis(50));
        s.push_command(Command::Left);
        let t1 = t0 + Duration::from_millis(100);
        s.mark_emitted(Command::Left, t1);
        assert!(matches!(
            s.decide(t1 + Duration::from_millis(500)),
            Decision::Hold(Command::Left, crate::debounce::Hold::Unchanged)
        ));
        assert_eq!(s.last_emitted_at(), t1);
    }
}
