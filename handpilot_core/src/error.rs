use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PilotError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timeout talking to vehicle")]
    Timeout,
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing landmark source")]
    MissingSource,
    #[error("missing transport")]
    MissingTransport,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
