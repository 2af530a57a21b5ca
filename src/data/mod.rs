//! Data models and processing for the dashboard.
//!
//! This module turns raw probe output into structured, display-ready data.
//!
//! ## Submodules
//!
//! - [`table`]: schema-less parser for the agent tool's `|`-delimited tables
//! - [`styling`]: ordered rule table that tags cells for presentation
//! - [`tasks`]: done/todo counters with the fallback estimate
//! - [`balance`]: credit balance readings and their display tiers
//! - [`duration`]: parsing of interval strings (e.g., "2s", "500ms")
//!
//! ## Data Flow
//!
//! ```text
//! ProbeResult (raw stdout)
//!        │
//!        ▼
//! table::parse()
//!        │
//!        ├──▶ ParsedTable (cells tagged by styling::classify)
//!        │
//!        └──▶ EmptyNotice (unparsable or empty input)
//! ```

pub mod balance;
pub mod duration;
pub mod styling;
pub mod table;
pub mod tasks;

pub use balance::{balance_tier, BalanceReading, BalanceSnapshot};
pub use styling::{CellTag, StyledCell};
pub use table::{parse, EmptyNotice, KeepMode, Parsed, ParsedTable};
pub use tasks::TaskCounts;

/// Severity tier used for display colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}
