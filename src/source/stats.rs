//! File and word counters for the workspace the agent writes into.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ProbeError;

/// Counter values as shown in the header. Failures show as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub files: String,
    pub words: String,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            files: "0".to_string(),
            words: "0".to_string(),
        }
    }
}

/// Counts files with a given extension under a directory, and their words.
///
/// At most one walk runs at a time. A walk that outlives the timeout is told
/// to stop, and later ticks report zero until it has wound down.
#[derive(Debug, Clone)]
pub struct WorkspaceStats {
    dir: PathBuf,
    extension: String,
    timeout: Duration,
    walking: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the walk ends, however it ends.
struct WalkGuard(Arc<AtomicBool>);

impl Drop for WalkGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WorkspaceStats {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
            timeout,
            walking: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a previous walk is still running.
    pub fn is_walking(&self) -> bool {
        self.walking.load(Ordering::SeqCst)
    }

    /// Count on the blocking pool, bounded by the configured timeout.
    pub async fn collect(&self) -> StatsSnapshot {
        if self.walking.swap(true, Ordering::SeqCst) {
            warn!(dir = %self.dir.display(), "previous walk still running");
            return StatsSnapshot::default();
        }

        let guard = WalkGuard(self.walking.clone());
        let cancel = Arc::new(AtomicBool::new(false));
        let dir = self.dir.clone();
        let ext = self.extension.clone();
        let flag = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            count(&dir, &ext, &flag)
        });

        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(counts)) => counts,
            Ok(Err(join)) => Err(ProbeError::Io(join.to_string())),
            Err(_) => {
                cancel.store(true, Ordering::SeqCst);
                Err(ProbeError::Timeout(self.timeout))
            }
        };

        match result {
            Ok((files, words)) => StatsSnapshot {
                files: files.to_string(),
                words: words.to_string(),
            },
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "stats probe failed");
                StatsSnapshot::default()
            }
        }
    }
}

/// Returns `(file_count, word_count)` for matching files under `dir`.
///
/// Unreadable files still count as files but contribute no words. The walk
/// stops early with [`ProbeError::Cancelled`] once `cancel` is set.
pub fn count(
    dir: &Path,
    extension: &str,
    cancel: &AtomicBool,
) -> Result<(u64, u64), ProbeError> {
    if !dir.is_dir() {
        return Err(ProbeError::Io(format!("{} is not a directory", dir.display())));
    }

    let mut files = 0u64;
    let mut words = 0u64;

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if cancel.load(Ordering::Relaxed) {
            return Err(ProbeError::Cancelled);
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        files += 1;
        if let Ok(bytes) = std::fs::read(entry.path()) {
            words += String::from_utf8_lossy(&bytes).split_whitespace().count() as u64;
        }
    }

    Ok((files, words))
}
