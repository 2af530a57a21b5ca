//! External data collectors.
//!
//! Every collector is failure-isolated: whatever goes wrong (spawn error,
//! timeout, HTTP status, bad JSON) is folded into a value the dashboard can
//! render, never propagated up to the refresh loop.
//!
//! - [`CommandProbe`]: runs the agent tool and captures stdout
//! - [`BalanceProbe`]: queries the credit balance endpoint
//! - [`WorkspaceStats`]: counts files and words under a directory
//! - [`credentials`]: resolves the bearer token for the balance endpoint

mod balance;
mod command;
pub mod credentials;
mod stats;

pub use balance::{
    BalanceProbe, BalanceSource, CreditsResponse, DEFAULT_ENDPOINT as DEFAULT_BALANCE_ENDPOINT,
};
pub use command::CommandProbe;
pub use stats::{StatsSnapshot, WorkspaceStats};

use std::fmt::Debug;

use async_trait::async_trait;

/// Outcome of a text-producing probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success(String),
    Failure(String),
}

impl ProbeResult {
    /// Raw text, if the probe succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ProbeResult::Success(s) => Some(s),
            ProbeResult::Failure(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeResult::Failure(_))
    }
}

/// A source of raw table text.
///
/// Implementations must bound their own running time and must not panic;
/// failures are reported as [`ProbeResult::Failure`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use ralph_hub::source::{CommandProbe, TextProbe};
///
/// # tokio_test::block_on(async {
/// let probe = CommandProbe::new("ralph", ["events"], Duration::from_secs(10));
/// let result = probe.fetch().await;
/// println!("{:?}", result.text());
/// # });
/// ```
#[async_trait]
pub trait TextProbe: Send + Sync + Debug {
    /// Run the probe once.
    async fn fetch(&self) -> ProbeResult;

    /// Returns a human-readable description of the probe.
    fn description(&self) -> &str;
}
