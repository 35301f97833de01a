//! cryptoreport core: configuration, domain types, run log, fetch and transform.
//!
//! This crate holds everything up to (but not including) artifact export:
//! - `ReportConfig`: the immutable per-run configuration
//! - `RunLog`: the shared append-only status log
//! - `MarketDataProvider` + `CoinGeckoProvider`: the one HTTP request per run
//! - `Transformer`: raw records → sorted `ReportRow`s

pub mod clock;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod runlog;
pub mod transform;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ExportVariant, ReportConfig};
pub use data::{CoinGeckoProvider, Fetcher, MarketDataProvider, MarketQuery, StaticProvider};
pub use domain::{MarketRecord, RawTable, ReportRow};
pub use error::{ErrorKind, ReportError};
pub use runlog::RunLog;
pub use transform::{Transformed, Transformer};
