//! Subprocess probe for the agent tool CLI.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ProbeResult, TextProbe};
use crate::error::ProbeError;

/// Runs `<program> <args...>` and returns its stdout.
///
/// Only stdout is used; the tool's exit code is not trusted, so a non-zero
/// exit still yields [`ProbeResult::Success`] with whatever was printed.
/// The child is killed if the timeout elapses.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    description: String,
}

impl CommandProbe {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let description = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program,
            args,
            timeout,
            description,
        }
    }

    async fn run(&self) -> Result<String, ProbeError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Io(e.to_string()))?;

        if !output.status.success() {
            debug!(probe = %self.description, status = %output.status, "non-zero exit");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextProbe for CommandProbe {
    async fn fetch(&self) -> ProbeResult {
        match self.run().await {
            Ok(stdout) => ProbeResult::Success(stdout),
            Err(e) => {
                warn!(probe = %self.description, error = %e, "probe failed");
                ProbeResult::Failure(e.to_string())
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
