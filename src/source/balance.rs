//! Credit balance probe for the billing endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::BalanceReading;
use crate::error::ProbeError;

/// Default credits endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/credits";

/// A source of balance readings.
#[async_trait]
pub trait BalanceSource: Send + Sync + std::fmt::Debug {
    /// Fetch the current balance. Never fails; errors become placeholders.
    async fn fetch(&self) -> BalanceReading;
}

/// Body of the credits endpoint. Missing numbers count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub data: CreditsData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsData {
    #[serde(default)]
    pub total_credits: f64,
    #[serde(default)]
    pub total_usage: f64,
}

impl CreditsResponse {
    /// Remaining credits.
    pub fn remaining(&self) -> f64 {
        self.data.total_credits - self.data.total_usage
    }
}

/// Queries the credits endpoint with a bearer token.
#[derive(Debug, Clone)]
pub struct BalanceProbe {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl BalanceProbe {
    /// Create a probe. With `api_key == None` no request is ever made.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
            timeout,
        }
    }

    async fn fetch_credits(&self, key: &str) -> Result<CreditsResponse, ProbeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(key)
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProbeError::Parse(e.to_string()))
    }
}

#[async_trait]
impl BalanceSource for BalanceProbe {
    async fn fetch(&self) -> BalanceReading {
        let Some(key) = self.api_key.as_deref() else {
            return BalanceReading::NoKey;
        };

        // The request carries its own timeout; the outer one also bounds DNS/connect.
        let result = tokio::time::timeout(self.timeout, self.fetch_credits(key))
            .await
            .unwrap_or(Err(ProbeError::Timeout(self.timeout)));

        match result {
            Ok(credits) => {
                let remaining = credits.remaining();
                debug!(remaining, "balance fetched");
                BalanceReading::Amount(remaining)
            }
            Err(ProbeError::Status(code)) => {
                warn!(code, "balance endpoint returned non-200");
                BalanceReading::HttpStatus(code)
            }
            Err(ProbeError::Parse(e)) => {
                warn!(error = %e, "balance response not understood");
                BalanceReading::Malformed
            }
            Err(e) => {
                warn!(error = %e, "balance request failed");
                BalanceReading::ConnError
            }
        }
    }
}
