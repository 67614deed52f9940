// Transport configuration for building the reqwest::Client.
//
// Kept separate from the endpoint methods so timeout policy lives in one
// place. The monitoring service imposes no timeout by default: a hung
// request stalls only the operation that issued it, never the poll cadence.

use std::time::Duration;

/// Transport settings for [`MonitorClient`](crate::MonitorClient).
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-request timeout. `None` means no timeout is imposed.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("hostpulse/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
