//! Layered configuration.
//!
//! Built-in defaults, then an optional TOML file, then `RALPH_HUB__*`
//! environment variables. Command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! [refresh]
//! tick = "2s"
//! balance_interval = "30s"
//!
//! [agent]
//! bin = "ralph"
//! task_args = ["tools", "task", "list"]
//! event_args = ["events"]
//! closed_ceiling = 200
//!
//! [stats]
//! dir = "lezioni"
//! extension = "md"
//!
//! [balance]
//! endpoint = "https://openrouter.ai/api/v1/credits"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::source::DEFAULT_BALANCE_ENDPOINT;

/// Environment variable prefix (`RALPH_HUB__AGENT__BIN=...`).
pub const ENV_PREFIX: &str = "RALPH_HUB";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ralph-hub.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub refresh: RefreshSettings,
    pub agent: AgentSettings,
    pub stats: StatsSettings,
    pub balance: BalanceSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshSettings {
    /// Fast cadence: stats, tasks and events.
    pub tick: String,
    /// Slow cadence: balance endpoint.
    pub balance_interval: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    pub bin: String,
    pub task_args: Vec<String>,
    pub event_args: Vec<String>,
    pub timeout: String,
    /// Rows kept from the head of the task list.
    pub task_rows: usize,
    /// Rows kept from the tail of the event log.
    pub event_rows: usize,
    /// Assumed total task count for the done-count estimate.
    pub closed_ceiling: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsSettings {
    pub dir: PathBuf,
    pub extension: String,
    pub timeout: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceSettings {
    pub endpoint: String,
    pub timeout: String,
    /// Explicit key; skips discovery when set.
    pub api_key: Option<String>,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            tick: "2s".to_string(),
            balance_interval: "30s".to_string(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            bin: "ralph".to_string(),
            task_args: vec!["tools".into(), "task".into(), "list".into()],
            event_args: vec!["events".into()],
            timeout: "10s".to_string(),
            task_rows: 10,
            event_rows: 15,
            closed_ceiling: 200,
        }
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("lezioni"),
            extension: "md".to_string(),
            timeout: "5s".to_string(),
        }
    }
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BALANCE_ENDPOINT.to_string(),
            timeout: "5s".to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Load settings. An explicitly named file must exist; the default one may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("agent.task_args")
                    .with_list_parse_key("agent.event_args")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every duration string parses and both cadences are non-zero.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.tick()?.is_zero(), "refresh.tick must be greater than zero");
        ensure!(
            !self.balance_interval()?.is_zero(),
            "refresh.balance_interval must be greater than zero"
        );
        self.agent_timeout()?;
        self.stats_timeout()?;
        self.balance_timeout()?;
        Ok(())
    }

    pub fn tick(&self) -> Result<Duration> {
        parse_duration(&self.refresh.tick).context("refresh.tick")
    }

    pub fn balance_interval(&self) -> Result<Duration> {
        parse_duration(&self.refresh.balance_interval).context("refresh.balance_interval")
    }

    pub fn agent_timeout(&self) -> Result<Duration> {
        parse_duration(&self.agent.timeout).context("agent.timeout")
    }

    pub fn stats_timeout(&self) -> Result<Duration> {
        parse_duration(&self.stats.timeout).context("stats.timeout")
    }

    pub fn balance_timeout(&self) -> Result<Duration> {
        parse_duration(&self.balance.timeout).context("balance.timeout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.tick().unwrap(), Duration::from_secs(2));
        assert_eq!(s.balance_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(s.agent.bin, "ralph");
        assert_eq!(s.agent.task_args, vec!["tools", "task", "list"]);
        assert_eq!(s.agent.task_rows, 10);
        assert_eq!(s.agent.event_rows, 15);
        assert_eq!(s.agent.closed_ceiling, 200);
        assert_eq!(s.stats.dir, PathBuf::from("lezioni"));
        assert!(s.balance.api_key.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[refresh]
tick = "500ms"

[agent]
bin = "/opt/ralph/bin/ralph"
closed_ceiling = 50
"#
        )
        .unwrap();

        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.tick().unwrap(), Duration::from_millis(500));
        assert_eq!(s.balance_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(s.agent.bin, "/opt/ralph/bin/ralph");
        assert_eq!(s.agent.closed_ceiling, 50);
        assert_eq!(s.agent.event_args, vec!["events"]);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/ralph-hub.toml"))).is_err());
    }

    #[test]
    fn test_zero_cadences_are_rejected() {
        let mut s = Settings::default();
        s.refresh.tick = "0s".into();
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("refresh.tick"));

        let mut s = Settings::default();
        s.refresh.balance_interval = "0ms".into();
        assert!(s.validate().is_err());

        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[refresh]\ntick = \"0\"").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_bad_duration_is_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[refresh]\ntick = \"often\"").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("refresh.tick"));
    }
}
