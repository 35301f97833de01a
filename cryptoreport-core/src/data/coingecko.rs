//! CoinGecko market-data provider.
//!
//! Issues one GET against `/coins/markets` per run. There is no retry loop:
//! a failed request ends the run and the operator re-invokes it.

use std::time::Duration;

use super::provider::{MarketDataProvider, MarketQuery};
use crate::config::{ReportConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::MarketRecord;
use crate::error::ReportError;

const USER_AGENT: &str = concat!("cryptoreport/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a `HttpStatus` error.
const MAX_ERROR_BODY: usize = 512;

pub struct CoinGeckoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn builder() -> CoinGeckoProviderBuilder {
        CoinGeckoProviderBuilder::default()
    }

    /// Provider for the configured endpoint and timeout.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        Self::builder()
            .base_url(&config.api_url)
            .timeout(config.timeout())
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn truncate_body(body: &str) -> String {
        match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        }
    }
}

impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<MarketRecord>, ReportError> {
        let params = query.params();
        tracing::debug!(url = %self.base_url, ?params, "requesting market data");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ReportError::Transport(format!("request timed out: {e}"))
                } else {
                    ReportError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(%status, "market data request rejected");
            return Err(ReportError::HttpStatus {
                status: status.as_u16(),
                body: Self::truncate_body(&body),
            });
        }

        let records: Vec<MarketRecord> = resp
            .json()
            .map_err(|e| ReportError::Decode(e.to_string()))?;
        tracing::debug!(count = records.len(), "decoded market records");
        Ok(records)
    }
}

pub struct CoinGeckoProviderBuilder {
    base_url: String,
    timeout: Duration,
    use_proxy: bool,
}

impl Default for CoinGeckoProviderBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_proxy: true,
        }
    }
}

impl CoinGeckoProviderBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_proxy = false;
        self
    }

    pub fn build(self) -> Result<CoinGeckoProvider, ReportError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);
        if !self.use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ReportError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(CoinGeckoProvider {
            client,
            base_url: self.base_url,
        })
    }
}
