use thiserror::Error;

/// Top-level error type for the `hostpulse-core` crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Error from the monitoring service API.
    #[error(transparent)]
    Api(#[from] hostpulse_api::Error),

    /// The session's command channel is closed (session shut down).
    #[error("Session is shut down")]
    SessionClosed,
}
