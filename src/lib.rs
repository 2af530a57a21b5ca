//! # ralph-hub
//!
//! A live terminal dashboard for the `ralph` agent tool.
//!
//! The dashboard polls the tool's CLI (`task list`, `events`), a credit
//! balance endpoint and a couple of filesystem counters, then renders the
//! combined state as a header strip and two side-by-side panels. The tool's
//! output is loosely formatted `|`-delimited text whose columns change
//! between versions; the [`data::table`] parser reads it without a schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (tick)  │    │ (parse)  │    │ (draw)  │    │          │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── CommandProbe | BalanceProbe | WorkspaceStats │
//! │  │ (probe) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: dashboard state and the two-cadence refresh scheduler
//! - **[`source`]**: failure-isolated collectors behind the [`TextProbe`] and
//!   [`BalanceSource`] traits
//! - **[`data`]**: table parsing, cell styling rules, task counts, balance tiers
//! - **[`ui`]**: ratatui compositor and theme
//! - **[`sniffer`]**: access-log synthesizer used by the `ralph-sniffer` binary
//!
//! ## Usage
//!
//! ```bash
//! # Dashboard with defaults (ralph on PATH, ./lezioni for counters)
//! ralph-hub
//!
//! # Faster refresh, explicit config, logs to a file
//! ralph-hub --refresh 1s --config ralph-hub.toml --log-file hub.log
//!
//! # Access log for lnav
//! ralph-sniffer --input .ralph/history.jsonl --output .ralph/network_sniffer.log
//! ```
//!
//! ### Parsing tool output as a library
//!
//! ```
//! use ralph_hub::data::{parse, CellTag, KeepMode};
//!
//! let parsed = parse("ID | Status\n1 | open\n2 | closed", 10, KeepMode::Earliest);
//! let table = parsed.as_table().unwrap();
//! assert_eq!(table.cell(1, "Status").unwrap().tag, CellTag::Positive);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod sniffer;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, DashboardState, Phase};
pub use data::{parse, CellTag, KeepMode, Parsed, ParsedTable, StyledCell};
pub use error::ProbeError;
pub use source::{BalanceSource, ProbeResult, TextProbe};
