//! Run orchestration: fetch → transform → export behind one failure boundary.

use std::sync::Arc;

use cryptoreport_core::{
    Clock, Fetcher, MarketDataProvider, ReportConfig, ReportError, RunLog, Transformer,
};

use crate::export::{Exporter, ReportArtifact};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub row_count: usize,
    pub artifacts: Vec<ReportArtifact>,
}

pub struct Pipeline {
    config: ReportConfig,
    provider: Box<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    log: Arc<RunLog>,
}

impl Pipeline {
    pub fn new(
        config: ReportConfig,
        provider: Box<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        log: Arc<RunLog>,
    ) -> Self {
        Self {
            config,
            provider,
            clock,
            log,
        }
    }

    /// Execute one run. Any stage failure is logged once as `ERROR: <message>`
    /// and returned; nothing is retried.
    pub fn run(&self) -> Result<RunSummary, ReportError> {
        match self.stages() {
            Ok(summary) => {
                self.log.log("Run finished successfully.")?;
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(kind = ?err.kind(), error = %err, "report run failed");
                if let Err(log_err) = self.log.log(format!("ERROR: {err}")) {
                    tracing::warn!(error = %log_err, "could not record failure in run log");
                }
                Err(err)
            }
        }
    }

    fn stages(&self) -> Result<RunSummary, ReportError> {
        let records = Fetcher::new(self.provider.as_ref(), &self.config, self.log.clone()).fetch()?;
        let transformed =
            Transformer::new(self.clock.clone(), self.log.clone()).transform(records)?;
        let artifacts = Exporter::new(&self.config, self.clock.clone(), self.log.clone())
            .export(&transformed.raw, &transformed.rows)?;
        Ok(RunSummary {
            row_count: transformed.rows.len(),
            artifacts,
        })
    }
}
