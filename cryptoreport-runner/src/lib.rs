//! cryptoreport runner: artifact export and run orchestration.
//!
//! Builds on `cryptoreport-core`:
//! - `Exporter`: CSV, JSON, HTML, PDF, price chart and table-preview PNGs
//! - `Pipeline`: fetch → transform → export with a single failure boundary

pub mod export;
pub mod pipeline;

pub use export::{ArtifactKind, Exporter, ReportArtifact, RunStamp, REPORT_TITLE};
pub use pipeline::{Pipeline, RunSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn exporter_and_pipeline_are_send_sync() {
        assert_send::<Exporter>();
        assert_sync::<Exporter>();
        assert_send::<Pipeline>();
        assert_sync::<Pipeline>();
    }

    #[test]
    fn run_summary_is_send_sync() {
        assert_send::<RunSummary>();
        assert_sync::<RunSummary>();
    }
}
