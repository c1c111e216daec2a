//! Concrete collaborators for the gesture pilot: where landmarks come from and
//! where commands go.
pub mod error;
pub mod http;
pub mod replay;
pub mod sim;

pub use http::HttpTransport;
pub use replay::ReplaySource;
pub use sim::SimulatedHand;

use handpilot_traits::Transport;

use crate::error::IoError;

/// Transport that only logs; used for dry runs.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    sent: Vec<(char, u32)>,
    fail: bool,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail as if the vehicle were unreachable.
    pub fn failing() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }

    /// Commands accepted so far, in order.
    pub fn sent(&self) -> &[(char, u32)] {
        &self.sent
    }
}

impl Transport for SimulatedTransport {
    fn send(
        &mut self,
        code: char,
        speed: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err(Box::new(IoError::Http(
                "simulated vehicle unreachable".to_string(),
            )));
        }
        tracing::info!(command = %code, speed, "command (simulated)");
        self.sent.push((code, speed));
        Ok(())
    }

    fn target(&self) -> String {
        String::from("simulated")
    }
}
