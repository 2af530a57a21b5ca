use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use ralph_hub::app::{App, Collectors, Limits, Scheduler};
use ralph_hub::config::Settings;
use ralph_hub::events;
use ralph_hub::ui::{self, Theme};

/// Upper bound on how long the loop waits for input between redraws.
const INPUT_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "ralph-hub")]
#[command(about = "Live dashboard for the ralph agent: task queue, event timeline and credit balance")]
struct Args {
    /// Config file (defaults to ./ralph-hub.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval for tasks, events and stats (e.g., "2s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Interval between balance queries (e.g., "30s", "1m")
    #[arg(long)]
    balance_interval: Option<String>,

    /// Agent tool binary
    #[arg(long)]
    agent_bin: Option<String>,

    /// Directory scanned for the file and word counters
    #[arg(long)]
    stats_dir: Option<PathBuf>,

    /// Append logs to this file (the terminal is owned by the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command-line overrides on top of the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref tick) = self.refresh {
            settings.refresh.tick = tick.clone();
        }
        if let Some(ref interval) = self.balance_interval {
            settings.refresh.balance_interval = interval.clone();
        }
        if let Some(ref bin) = self.agent_bin {
            settings.agent.bin = bin.clone();
        }
        if let Some(ref dir) = self.stats_dir {
            settings.stats.dir = dir.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path, args.verbose)?;
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    let scheduler = Scheduler::new(settings.tick()?, settings.balance_interval()?);
    let collectors = Collectors::from_settings(&settings)?;
    let app = App::new(collectors, scheduler, Limits::from_settings(&settings))?;

    info!(agent = %settings.agent.bin, tick = %settings.refresh.tick, "starting dashboard");
    run_tui(app)
}

/// Log to a file; stdout/stderr belong to the TUI.
fn init_logging(path: &Path, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::from_default_env().add_directive(format!("ralph_hub={}", level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Run the TUI until interrupted
fn run_tui(mut app: App) -> Result<()> {
    // SIGINT/SIGTERM from outside the terminal (kill, process managers)
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let theme = Theme::auto_detect();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &theme, &running);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    running: &AtomicBool,
) -> Result<()> {
    while app.is_running() {
        if !running.load(Ordering::SeqCst) {
            app.quit();
            break;
        }

        app.tick(Instant::now());

        // Redraw every pass so the "updated ago" age stays current; ratatui
        // only flushes the cells that changed.
        terminal.draw(|frame| ui::draw(frame, app.state(), theme))?;
        app.rendered();

        let wait = app.scheduler.until_next_tick(Instant::now()).min(INPUT_POLL);
        if let Some(Event::Key(key)) = events::poll_event(wait)? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
