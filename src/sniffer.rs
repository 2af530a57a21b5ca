//! Access-log synthesizer for the agent's JSONL history.
//!
//! The agent appends one JSON record per line to its history file. The
//! sniffer follows that file from its current end and turns every new
//! record into a one-line, access-log style entry that ordinary log viewers
//! (lnav and friends) can colour and filter:
//!
//! ```text
//! 127.0.0.1 - - [14:03:27] "POST /anthropic/claude-sonnet HTTP/1.1" 200 5120 512ms
//! ```
//!
//! The agent does not record request timings, so method, status and latency
//! are inferred from the record's shape and size.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default model name when the record has none.
pub const DEFAULT_MODEL: &str = "ralph-core";

/// Default time of day when the record has no usable timestamp.
pub const DEFAULT_TIME: &str = "00:00:00";

/// How often the input file is checked for new lines.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One synthesized access-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub time: String,
    pub method: &'static str,
    pub model: String,
    pub status: u16,
    pub size: usize,
    pub latency_ms: usize,
}

impl AccessRecord {
    /// Build a record from one raw history line (including its newline).
    ///
    /// Returns `None` for lines that are not JSON objects.
    pub fn from_line(line: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(line.trim()).ok()?;
        let obj = value.as_object()?;

        let time = obj
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(time_of_day)
            .unwrap_or_else(|| DEFAULT_TIME.to_string());

        let model = obj
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MODEL);
        let model = model.strip_prefix("openrouter/").unwrap_or(model).to_string();

        let has_choices = obj.contains_key("choices");
        let size = line.len();

        Some(Self {
            time,
            method: if has_choices { "POST" } else { "GET" },
            model,
            status: if has_choices || obj.contains_key("event_type") {
                200
            } else {
                500
            },
            size,
            latency_ms: size / 10,
        })
    }

    /// Render as a single access-log line, without trailing newline.
    pub fn to_log_line(&self) -> String {
        format!(
            "127.0.0.1 - - [{}] \"{} /{} HTTP/1.1\" {} {} {}ms",
            self.time, self.method, self.model, self.status, self.size, self.latency_ms
        )
    }
}

/// `2025-01-07T14:03:27.123456Z` → `14:03:27`.
fn time_of_day(timestamp: &str) -> Option<String> {
    let (_, time) = timestamp.split_once('T')?;
    Some(time.chars().take(8).collect())
}

/// Tails an input file and appends synthesized records to an output file.
#[derive(Debug)]
pub struct Sniffer {
    input: PathBuf,
    output: PathBuf,
    reader: BufReader<File>,
    pending: Vec<u8>,
}

impl Sniffer {
    /// Open `input` (creating it if missing) positioned at its current end.
    pub fn open(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Self> {
        let input = input.as_ref().to_path_buf();
        if let Some(parent) = input.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&input)
            .with_context(|| format!("failed to open {}", input.display()))?;
        file.seek(SeekFrom::End(0))?;

        Ok(Self {
            input,
            output: output.as_ref().to_path_buf(),
            reader: BufReader::new(file),
            pending: Vec::new(),
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Read every complete line appended since the last call.
    ///
    /// Returns the number of records written to the output file. A partial
    /// trailing line is kept until its newline arrives. Invalid UTF-8 is
    /// replaced rather than rejected, and a failed append is logged and the
    /// record dropped.
    pub fn poll_once(&mut self) -> Result<usize> {
        let mut written = 0;
        loop {
            let read = self.reader.read_until(b'\n', &mut self.pending)?;
            if read == 0 || self.pending.last() != Some(&b'\n') {
                return Ok(written);
            }

            let bytes = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&bytes);
            match AccessRecord::from_line(&line) {
                Some(record) => match self.append(&record) {
                    Ok(()) => written += 1,
                    Err(e) => warn!(error = %e, "failed to append record"),
                },
                None => debug!(len = line.len(), "skipping non-JSON line"),
            }
        }
    }

    fn append(&self, record: &AccessRecord) -> Result<()> {
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .with_context(|| format!("failed to open {}", self.output.display()))?;
        writeln!(out, "{}", record.to_log_line())?;
        Ok(())
    }

    /// Poll until `running` is cleared.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        info!(input = %self.input.display(), output = %self.output.display(), "sniffer started");
        while running.load(Ordering::SeqCst) {
            if self.poll_once()? == 0 {
                std::thread::sleep(POLL_INTERVAL);
            }
        }
        info!("sniffer stopped");
        Ok(())
    }
}
