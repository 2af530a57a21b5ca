//! Error types for probes.
//!
//! Probe errors never leave the collector that produced them: every probe
//! folds its [`ProbeError`] into a displayable placeholder.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying an external data source.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The external process could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The call did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP answered with an unexpected status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Failed to parse response.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The work was abandoned before it finished.
    #[error("cancelled")]
    Cancelled,

    /// Filesystem walk or blocking task failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProbeError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ProbeError::Status(status.as_u16())
        } else {
            ProbeError::Connection(err.to_string())
        }
    }
}
