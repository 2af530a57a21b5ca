//! Application state and the refresh scheduler.
//!
//! [`App`] owns the collectors, a tokio runtime used to drive them and the
//! [`DashboardState`] the compositor reads. One call to [`App::tick`] is one
//! poll cycle: the fast probes always run, the balance probe runs only when
//! its own cadence is due. Probes run one after the other; each bounds its
//! own running time, so a hung probe delays the frame but never stalls the
//! loop for longer than its timeout.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Settings;
use crate::data::{parse, BalanceSnapshot, KeepMode, Parsed, TaskCounts};
use crate::source::{
    credentials, BalanceProbe, BalanceSource, CommandProbe, ProbeResult, StatsSnapshot, TextProbe,
    WorkspaceStats,
};

/// Lifecycle of the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next tick.
    Idle,
    /// Collectors are running.
    Polling,
    /// State is fresh and a frame should be drawn.
    Rendering,
    /// Interrupted; the terminal is being restored.
    Terminated,
}

/// What a panel shows: a parsed table/notice, or a probe failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Parsed(Parsed),
    Failed(String),
}

impl PanelContent {
    fn from_probe(result: &ProbeResult, max_rows: usize, keep: KeepMode) -> Self {
        match result {
            ProbeResult::Success(text) => PanelContent::Parsed(parse(text, max_rows, keep)),
            ProbeResult::Failure(reason) => PanelContent::Failed(reason.clone()),
        }
    }
}

/// Everything the compositor draws. Written only by [`App::tick`].
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub stats: StatsSnapshot,
    pub counts: TaskCounts,
    pub tasks: PanelContent,
    pub events: PanelContent,
    /// `None` until the first balance fetch completes.
    pub balance: Option<BalanceSnapshot>,
    /// When the fast probes last completed.
    pub updated_at: Option<Instant>,
}

impl Default for DashboardState {
    fn default() -> Self {
        let loading = PanelContent::Parsed(parse("", 0, KeepMode::Earliest));
        Self {
            stats: StatsSnapshot::default(),
            counts: TaskCounts::default(),
            tasks: loading.clone(),
            events: loading,
            balance: None,
            updated_at: None,
        }
    }
}

/// Two cadences sharing one loop, modelled as due-checks on timestamps.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub tick: Duration,
    pub balance_interval: Duration,
    last_tick: Option<Instant>,
    last_balance: Option<Instant>,
}

impl Scheduler {
    pub fn new(tick: Duration, balance_interval: Duration) -> Self {
        Self {
            tick,
            balance_interval,
            last_tick: None,
            last_balance: None,
        }
    }

    /// Fast probes are due on the first call and every `tick` after.
    pub fn tick_due(&self, now: Instant) -> bool {
        self.last_tick
            .is_none_or(|t| now.saturating_duration_since(t) >= self.tick)
    }

    /// Balance is due when never attempted or strictly older than the interval.
    pub fn balance_due(&self, now: Instant) -> bool {
        self.last_balance
            .is_none_or(|t| now.saturating_duration_since(t) > self.balance_interval)
    }

    pub fn mark_tick(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Record a balance attempt, successful or not.
    pub fn mark_balance(&mut self, now: Instant) {
        self.last_balance = Some(now);
    }

    /// Time left until the next fast tick.
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.last_tick.map_or(Duration::ZERO, |t| {
            self.tick.saturating_sub(now.saturating_duration_since(t))
        })
    }
}

/// The collectors the dashboard polls.
#[derive(Debug)]
pub struct Collectors {
    pub tasks: Box<dyn TextProbe>,
    pub events: Box<dyn TextProbe>,
    pub stats: WorkspaceStats,
    pub balance: Box<dyn BalanceSource>,
}

impl Collectors {
    /// Build the real collectors from settings, resolving the API key.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let agent_timeout = settings.agent_timeout()?;
        let api_key = settings
            .balance
            .api_key
            .clone()
            .or_else(credentials::find_api_key);
        if api_key.is_none() {
            info!("no API key found; balance will not be queried");
        }

        Ok(Self {
            tasks: Box::new(CommandProbe::new(
                settings.agent.bin.clone(),
                settings.agent.task_args.clone(),
                agent_timeout,
            )),
            events: Box::new(CommandProbe::new(
                settings.agent.bin.clone(),
                settings.agent.event_args.clone(),
                agent_timeout,
            )),
            stats: WorkspaceStats::new(
                settings.stats.dir.clone(),
                settings.stats.extension.clone(),
                settings.stats_timeout()?,
            ),
            balance: Box::new(BalanceProbe::new(
                settings.balance.endpoint.clone(),
                api_key,
                settings.balance_timeout()?,
            )),
        })
    }
}

/// Panel sizing and the done-count heuristic.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub task_rows: usize,
    pub event_rows: usize,
    pub closed_ceiling: usize,
}

impl Limits {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            task_rows: settings.agent.task_rows,
            event_rows: settings.agent.event_rows,
            closed_ceiling: settings.agent.closed_ceiling,
        }
    }
}

/// Main application state.
pub struct App {
    pub phase: Phase,
    pub scheduler: Scheduler,
    state: DashboardState,
    collectors: Collectors,
    limits: Limits,
    runtime: tokio::runtime::Runtime,
}

impl App {
    /// Create a new App. Fails only if the async runtime cannot start.
    pub fn new(collectors: Collectors, scheduler: Scheduler, limits: Limits) -> Result<Self> {
        Ok(Self {
            phase: Phase::Idle,
            scheduler,
            state: DashboardState::default(),
            collectors,
            limits,
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    /// Read-only view for the compositor.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Terminated
    }

    /// Signal the loop to stop after the current step.
    pub fn quit(&mut self) {
        self.phase = Phase::Terminated;
    }

    /// Run one poll cycle if the fast cadence is due.
    ///
    /// Returns `true` when the state changed and a frame should be drawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_running() || !self.scheduler.tick_due(now) {
            return false;
        }
        self.phase = Phase::Polling;

        if self.scheduler.balance_due(now) {
            let reading = self.runtime.block_on(self.collectors.balance.fetch());
            debug!(balance = %reading.label(), "balance polled");
            self.state.balance = Some(BalanceSnapshot::new(reading, Instant::now()));
            self.scheduler.mark_balance(now);
        }

        let stats = self.runtime.block_on(self.collectors.stats.collect());
        let tasks = self.runtime.block_on(self.collectors.tasks.fetch());
        let events = self.runtime.block_on(self.collectors.events.fetch());

        self.state.counts = TaskCounts::derive(&tasks, &events, self.limits.closed_ceiling);
        self.state.tasks =
            PanelContent::from_probe(&tasks, self.limits.task_rows, KeepMode::Earliest);
        self.state.events =
            PanelContent::from_probe(&events, self.limits.event_rows, KeepMode::Latest);
        self.state.stats = stats;
        self.state.updated_at = Some(Instant::now());

        self.scheduler.mark_tick(now);
        if self.phase == Phase::Polling {
            self.phase = Phase::Rendering;
        }
        true
    }

    /// Mark the current frame as drawn.
    pub fn rendered(&mut self) {
        if self.phase == Phase::Rendering {
            self.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::{BalanceReading, CellTag};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    pub(crate) struct FixedProbe(pub ProbeResult);

    #[async_trait]
    impl TextProbe for FixedProbe {
        async fn fetch(&self) -> ProbeResult {
            self.0.clone()
        }

        fn description(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct CountingBalance(pub Arc<AtomicUsize>);

    #[async_trait]
    impl BalanceSource for CountingBalance {
        async fn fetch(&self) -> BalanceReading {
            self.0.fetch_add(1, Ordering::SeqCst);
            BalanceReading::Amount(4.2)
        }
    }

    pub(crate) fn fixture_app(tasks: ProbeResult, events: ProbeResult) -> (App, Arc<AtomicUsize>) {
        let balance = CountingBalance::default();
        let calls = balance.0.clone();
        let collectors = Collectors {
            tasks: Box::new(FixedProbe(tasks)),
            events: Box::new(FixedProbe(events)),
            stats: WorkspaceStats::new("/nonexistent/lezioni", "md", Duration::from_secs(1)),
            balance: Box::new(balance),
        };
        let app = App::new(
            collectors,
            Scheduler::new(Duration::from_secs(2), Duration::from_secs(30)),
            Limits {
                task_rows: 10,
                event_rows: 15,
                closed_ceiling: 200,
            },
        )
        .unwrap();
        (app, calls)
    }

    #[test]
    fn test_scheduler_balance_cadence() {
        let start = Instant::now();
        let mut s = Scheduler::new(Duration::from_secs(2), Duration::from_secs(30));
        assert!(s.balance_due(start));
        s.mark_balance(start);
        assert!(!s.balance_due(start + Duration::from_secs(2)));
        assert!(!s.balance_due(start + Duration::from_secs(30)));
        assert!(s.balance_due(start + Duration::from_secs(31)));
    }

    #[test]
    fn test_scheduler_tick_cadence() {
        let start = Instant::now();
        let mut s = Scheduler::new(Duration::from_secs(2), Duration::from_secs(30));
        assert!(s.tick_due(start));
        assert_eq!(s.until_next_tick(start), Duration::ZERO);
        s.mark_tick(start);
        assert!(!s.tick_due(start + Duration::from_secs(1)));
        assert_eq!(
            s.until_next_tick(start + Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
        assert!(s.tick_due(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_tick_populates_state() {
        let (mut app, calls) = fixture_app(
            ProbeResult::Success("ID | Status\n1 | open\n2 | closed\n3 | open".into()),
            ProbeResult::Success("Time | Topic\n1 | task.close\n2 | task.start".into()),
        );
        let now = Instant::now();
        assert!(app.tick(now));
        assert_eq!(app.phase, Phase::Rendering);
        app.rendered();
        assert_eq!(app.phase, Phase::Idle);

        let state = app.state();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.balance.as_ref().map(|b| b.reading.clone()),
            Some(BalanceReading::Amount(4.2))
        );
        assert_eq!(
            state.counts,
            TaskCounts {
                done: 1,
                todo: 2,
                estimated: false
            }
        );
        assert_eq!(state.stats, StatsSnapshot::default());

        let PanelContent::Parsed(Parsed::Table(tasks)) = &state.tasks else {
            panic!("expected task table, got {:?}", state.tasks);
        };
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.cell(1, "Status").unwrap().tag, CellTag::Positive);
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn test_balance_polled_on_slow_cadence_only() {
        let (mut app, calls) = fixture_app(
            ProbeResult::Success(String::new()),
            ProbeResult::Success(String::new()),
        );
        let start = Instant::now();
        for step in 0..15u64 {
            assert!(app.tick(start + Duration::from_secs(step * 2)));
        }
        // Ticks at 0..=28s: only the first one fetches the balance.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(app.tick(start + Duration::from_secs(32)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tick_skipped_when_not_due() {
        let (mut app, _) = fixture_app(
            ProbeResult::Success(String::new()),
            ProbeResult::Success(String::new()),
        );
        let now = Instant::now();
        assert!(app.tick(now));
        assert!(!app.tick(now + Duration::from_millis(100)));
    }

    #[test]
    fn test_failures_become_placeholders() {
        let (mut app, _) = fixture_app(
            ProbeResult::Failure("timed out after 10s".into()),
            ProbeResult::Failure("failed to spawn ralph".into()),
        );
        assert!(app.tick(Instant::now()));
        let state = app.state();
        assert_eq!(state.tasks, PanelContent::Failed("timed out after 10s".into()));
        assert_eq!(state.counts, TaskCounts::default());
    }

    #[test]
    fn test_quit_stops_ticking() {
        let (mut app, calls) = fixture_app(
            ProbeResult::Success(String::new()),
            ProbeResult::Success(String::new()),
        );
        app.quit();
        assert!(!app.is_running());
        assert!(!app.tick(Instant::now()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(app.phase, Phase::Terminated);
    }
}
