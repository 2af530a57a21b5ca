use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use ralph_hub::sniffer::Sniffer;

#[derive(Parser, Debug)]
#[command(name = "ralph-sniffer")]
#[command(about = "Turn the agent's JSONL history into an access log for log viewers")]
struct Args {
    /// History file to follow
    #[arg(short, long, default_value = ".ralph/history.jsonl")]
    input: PathBuf,

    /// Access log to append to
    #[arg(short, long, default_value = ".ralph/network_sniffer.log")]
    output: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("ralph_hub={}", level).parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut sniffer = Sniffer::open(&args.input, &args.output)?;
    info!(
        "Following {} (open {} in lnav to view)",
        sniffer.input().display(),
        sniffer.output().display()
    );
    sniffer.run(&running)
}
