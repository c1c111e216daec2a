//! Majority vote over recent raw commands plus the emission gate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::command::Command;

/// Number of recent raw commands that vote.
pub const COMMAND_WINDOW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    buf: VecDeque<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            buf: VecDeque::with_capacity(COMMAND_WINDOW),
        }
    }

    pub fn push(&mut self, cmd: Command) {
        if self.buf.len() == COMMAND_WINDOW {
            self.buf.pop_front();
        }
        self.buf.push_back(cmd);
    }

    /// Most frequent command; ties go to the lowest `Command` index.
    pub fn majority(&self) -> Option<Command> {
        majority(self.buf.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Stored commands, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.buf.iter()
    }
}

/// Most frequent element; ties go to the lowest `Command` index.
pub fn majority(cmds: impl IntoIterator<Item = Command>) -> Option<Command> {
    let mut counts = [0usize; Command::ALL.len()];
    for c in cmds {
        counts[c.index()] += 1;
    }
    let mut best: Option<(Command, usize)> = None;
    for c in Command::ALL {
        let n = counts[c.index()];
        if n > 0 && best.is_none_or(|(_, m)| n > m) {
            best = Some((c, n));
        }
    }
    best.map(|(c, _)| c)
}

/// Why a frame did not produce a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Majority equals the last emitted command.
    Unchanged,
    /// Majority changed but the cooldown has not elapsed.
    Cooldown { remaining: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Emit(Command),
    Hold(Command, Hold),
}

/// Decide whether `majority` should be dispatched now.
///
/// Emits iff it differs from `last` and at least `cooldown` has passed since
/// `last_at`.
#[inline]
pub fn gate(
    majority: Command,
    last: Command,
    last_at: Instant,
    cooldown: Duration,
    now: Instant,
) -> Decision {
    if majority == last {
        return Decision::Hold(majority, Hold::Unchanged);
    }
    let elapsed = now.saturating_duration_since(last_at);
    if elapsed >= cooldown {
        Decision::Emit(majority)
    } else {
        Decision::Hold(
            majority,
            Hold::Cooldown {
                remaining: cooldown - elapsed,
            },
        )
    }
}
