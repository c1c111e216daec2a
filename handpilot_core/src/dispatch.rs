//! Serialized delivery of commands to the vehicle.

use handpilot_traits::Transport;

use crate::command::Command;
use crate::error::{PilotError, Result};
use crate::transport_error::map_transport_error;

/// Running totals of dispatch attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Wraps a `Transport`; one request at a time, never retried here.
pub struct Dispatcher<T: Transport> {
    transport: T,
    stats: DispatchStats,
}

impl<T: Transport> core::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("target", &self.transport.target())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            stats: DispatchStats::default(),
        }
    }

    /// Send `cmd`, returning the typed failure.
    pub fn try_send(&mut self, cmd: Command, speed: u32) -> std::result::Result<(), PilotError> {
        match self.transport.send(cmd.code(), speed) {
            Ok(()) => {
                self.stats.delivered += 1;
                tracing::info!(
                    command = cmd.label(),
                    code = %cmd.code(),
                    speed,
                    endpoint = %self.transport.target(),
                    "command sent"
                );
                Ok(())
            }
            Err(e) => {
                self.stats.failed += 1;
                let err = map_transport_error(e.as_ref());
                tracing::warn!(
                    command = cmd.label(),
                    speed,
                    endpoint = %self.transport.target(),
                    error = %err,
                    "command not delivered"
                );
                Err(err)
            }
        }
    }

    /// Send `cmd`; `true` when the vehicle accepted it. Failures are logged.
    pub fn dispatch(&mut self, cmd: Command, speed: u32) -> bool {
        self.try_send(cmd, speed).is_ok()
    }

    /// Eyre-flavoured `try_send` for callers that bubble errors up.
    pub fn send_or_report(&mut self, cmd: Command, speed: u32) -> Result<()> {
        self.try_send(cmd, speed).map_err(eyre::Report::new)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn target(&self) -> String {
        self.transport.target()
    }
}
