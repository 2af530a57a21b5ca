//! Credit balance readings and their display tiers.

use std::time::Instant;

use crate::data::HealthStatus;

/// Outcome of one balance fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceReading {
    /// `total_credits - total_usage`, in credits.
    Amount(f64),
    /// No credential could be resolved; no request was made.
    NoKey,
    /// The endpoint answered with a non-200 status.
    HttpStatus(u16),
    /// Transport failure or timeout.
    ConnError,
    /// 200 response whose body was not the expected JSON.
    Malformed,
}

impl BalanceReading {
    /// Placeholder or formatted amount for the header strip.
    pub fn label(&self) -> String {
        match self {
            BalanceReading::Amount(b) => format!("${:.4}", b),
            BalanceReading::NoKey => "No Key found".to_string(),
            BalanceReading::HttpStatus(code) => format!("HTTP {}", code),
            BalanceReading::ConnError => "Conn Error".to_string(),
            BalanceReading::Malformed => "Error".to_string(),
        }
    }

    /// Display tier, only defined for actual amounts.
    pub fn tier(&self) -> Option<HealthStatus> {
        match self {
            BalanceReading::Amount(b) => Some(balance_tier(*b)),
            _ => None,
        }
    }
}

/// Bucket a remaining balance: healthy above 1, warning above 0.1, else critical.
pub fn balance_tier(balance: f64) -> HealthStatus {
    if balance > 1.0 {
        HealthStatus::Healthy
    } else if balance > 0.1 {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// Last balance reading and when it was fetched.
#[derive(Debug, Clone)]
pub struct BalanceSnapshot {
    pub reading: BalanceReading,
    pub fetched_at: Instant,
}

impl BalanceSnapshot {
    pub fn new(reading: BalanceReading, fetched_at: Instant) -> Self {
        Self {
            reading,
            fetched_at,
        }
    }
}
