//! HTTP command transport.
//!
//! Each command is a GET to the configured base URL with `command` and `speed`
//! query parameters. Any 2xx status counts as delivered.

use std::time::Duration;

use handpilot_traits::Transport;
use reqwest::blocking::Client;

use crate::error::{IoError, Result};

pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IoError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn deliver(&self, code: char, speed: u32) -> Result<()> {
        let command = code.to_string();
        let speed = speed.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("command", command.as_str()), ("speed", speed.as_str())])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    IoError::Timeout
                } else {
                    IoError::Http(e.to_string())
                }
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(IoError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Transport for HttpTransport {
    fn send(
        &mut self,
        code: char,
        speed: u32,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(url = %self.base_url, command = %code, speed, "http send");
        self.deliver(code, speed)?;
        Ok(())
    }

    fn target(&self) -> String {
        self.base_url.clone()
    }
}
