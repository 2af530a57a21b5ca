//! Bearer token discovery for the balance endpoint.
//!
//! Lookup order: environment variables, then a fixed list of local config
//! files. Each file is first scanned for a token-shaped string, then read as
//! JSON for a handful of known keys. The first hit wins.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Environment variables checked, in order.
pub const ENV_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "OPENCODE_API_KEY"];

/// JSON keys checked, in order, when a file holds no token-shaped string.
const JSON_KEYS: [&str; 3] = ["OPENROUTER_API_KEY", "api_key", "token"];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"sk-or-v1-[a-zA-Z0-9]+").expect("valid regex"))
}

/// Default files searched for a token.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".opencode/config.json"));
        paths.push(home.join(".config/opencode/config.json"));
        paths.push(home.join(".opencode/state.json"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Resolve a token from the process environment and [`default_paths`].
pub fn find_api_key() -> Option<String> {
    let paths = default_paths();
    resolve(|name| std::env::var(name).ok(), &paths)
}

/// Resolve a token using `env` for variable lookup and the given files.
pub fn resolve<F>(env: F, paths: &[PathBuf]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    for name in ENV_VARS {
        if let Some(key) = env(name).filter(|k| !k.trim().is_empty()) {
            debug!(source = name, "api key found in environment");
            return Some(key.trim().to_string());
        }
    }

    paths.iter().find_map(|p| {
        let key = scan_file(p)?;
        debug!(path = %p.display(), "api key found in file");
        Some(key)
    })
}

/// Look for a token in one file. Missing or unreadable files yield `None`.
pub fn scan_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    scan_content(&content)
}

fn scan_content(content: &str) -> Option<String> {
    if let Some(m) = token_pattern().find(content) {
        return Some(m.as_str().to_string());
    }

    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    JSON_KEYS
        .iter()
        .find_map(|k| value.get(k)?.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
