use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("http error: {0}")]
    Http(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("transport timeout")]
    Timeout,
    #[error("capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, IoError>;
