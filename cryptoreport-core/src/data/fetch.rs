//! Fetch stage: one logged request for the configured universe.

use std::sync::Arc;

use super::provider::{MarketDataProvider, MarketQuery};
use crate::config::ReportConfig;
use crate::domain::MarketRecord;
use crate::error::ReportError;
use crate::runlog::RunLog;

pub struct Fetcher<'a> {
    provider: &'a dyn MarketDataProvider,
    query: MarketQuery,
    log: Arc<RunLog>,
}

impl<'a> Fetcher<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider, config: &ReportConfig, log: Arc<RunLog>) -> Self {
        Self {
            provider,
            query: MarketQuery::from_config(config),
            log,
        }
    }

    /// Fetch the raw records. A short response (fewer coins than requested)
    /// is returned as-is.
    pub fn fetch(&self) -> Result<Vec<MarketRecord>, ReportError> {
        self.log.log("Fetching API data...")?;
        let records = self.provider.fetch_markets(&self.query)?;
        if records.len() < self.query.ids.len() {
            tracing::warn!(
                provider = self.provider.name(),
                requested = self.query.ids.len(),
                received = records.len(),
                "provider returned fewer coins than requested"
            );
        }
        Ok(records)
    }
}
