//! Session configuration.

use std::time::Duration;

use url::Url;

/// Fixed cadence of the polling loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Samples kept per host, matching the service's own history bound.
pub const DEFAULT_RETENTION: usize = 50;

/// Maximum number of displayed hosts, enforced at host-add time.
pub const DEFAULT_HOST_LIMIT: usize = 60;

/// Configuration for a [`Session`](crate::Session).
///
/// No persisted configuration files belong to this core — everything is
/// supplied by the embedding binary.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the monitoring service.
    pub url: Url,
    /// Interval between poll ticks. Ticks never await the previous fetch.
    pub poll_interval: Duration,
    /// Per-host sample window kept client-side.
    pub retention: usize,
    /// Displayed-host cap.
    pub host_limit: usize,
    /// Per-request timeout; `None` imposes no timeout.
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    /// Config with default cadence and limits for the service at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retention: DEFAULT_RETENTION,
            host_limit: DEFAULT_HOST_LIMIT,
            timeout: None,
        }
    }
}
