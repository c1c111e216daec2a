//! Maps `Box<dyn Error>` from the trait seams to typed `PilotError`.
//!
//! `handpilot_traits` boxes errors so any source or transport can plug in;
//! with the `io-errors` feature the concrete `handpilot_io::error::IoError` is
//! recognised by downcast, otherwise the message text decides.

use crate::error::PilotError;

/// Map a transport-side error to a typed `PilotError`.
pub fn map_transport_error(e: &(dyn std::error::Error + 'static)) -> PilotError {
    #[cfg(feature = "io-errors")]
    {
        use handpilot_io::error::IoError;
        if let Some(io) = e.downcast_ref::<IoError>() {
            return match io {
                IoError::Timeout => PilotError::Timeout,
                IoError::Capture(msg) => PilotError::Capture(msg.clone()),
                other => PilotError::Transport(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        PilotError::Timeout
    } else {
        PilotError::Transport(s)
    }
}

/// Map a landmark-source error. Whatever the cause, the capture is gone.
pub fn map_capture_error(e: &(dyn std::error::Error + 'static)) -> PilotError {
    #[cfg(feature = "io-errors")]
    {
        if let Some(handpilot_io::error::IoError::Capture(msg)) =
            e.downcast_ref::<handpilot_io::error::IoError>()
        {
            return PilotError::Capture(msg.clone());
        }
    }
    PilotError::Capture(e.to_string())
}
