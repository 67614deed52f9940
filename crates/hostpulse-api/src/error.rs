use thiserror::Error;

/// Top-level error type for the `hostpulse-api` crate.
///
/// Covers transport failures, URL construction, service-level rejections,
/// and payload decoding. `hostpulse-core` maps these into user-facing
/// notifications.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, non-2xx, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service answered but rejected the request
    /// (e.g. `{"status": "error"}` on `/groups/add`).
    #[error("Service rejected request: {message}")]
    Rejected { message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
