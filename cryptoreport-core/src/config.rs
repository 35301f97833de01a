//! Run configuration: coin universe, quote currency, directories, limits.
//!
//! One immutable `ReportConfig` is built per run and handed to each component.
//! Defaults reproduce the stock report; a TOML file may override any key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which artifact set the exporter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportVariant {
    /// CSV, JSON and HTML only.
    Basic,
    /// Basic plus PDF, price chart and table previews.
    #[default]
    Extended,
}

impl std::str::FromStr for ExportVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            other => Err(ConfigError::Invalid(format!(
                "unknown export variant '{other}' (expected basic or extended)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Markets endpoint of the provider.
    pub api_url: String,
    /// Coin identifiers as the provider names them (e.g. `bitcoin`).
    pub coins: Vec<String>,
    /// Quote currency code (e.g. `usd`).
    pub vs_currency: String,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub timeout_secs: u64,
    pub variant: ExportVariant,
    /// Rows shown in the before/after preview images.
    pub preview_rows: usize,
    /// Echo run log lines to stdout.
    pub echo_log: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            coins: ["bitcoin", "ethereum", "solana", "dogecoin"]
                .into_iter()
                .map(String::from)
                .collect(),
            vs_currency: "usd".to_string(),
            output_dir: PathBuf::from("outputs"),
            log_dir: PathBuf::from("logs"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            variant: ExportVariant::Extended,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            echo_log: true,
        }
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coins.is_empty() {
            return Err(ConfigError::Invalid("coin list is empty".into()));
        }
        if let Some(blank) = self.coins.iter().find(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank coin id: {blank:?}")));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("vs_currency is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if self.preview_rows == 0 {
            return Err(ConfigError::Invalid("preview_rows must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Single page holding the whole universe.
    pub fn per_page(&self) -> usize {
        self.coins.len()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(crate::runlog::LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_report() {
        let c = ReportConfig::default();
        assert_eq!(c.coins, vec!["bitcoin", "ethereum", "solana", "dogecoin"]);
        assert_eq!(c.vs_currency, "usd");
        assert_eq!(c.per_page(), 4);
        assert_eq!(c.timeout(), Duration::from_secs(15));
        assert_eq!(c.variant, ExportVariant::Extended);
        assert_eq!(c.log_path(), PathBuf::from("logs").join("run.log"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ReportConfig::from_toml(
            r#"
            coins = ["bitcoin", "cardano"]
            vs_currency = "eur"
            variant = "basic"
            "#,
        )
        .unwrap();
        assert_eq!(c.coins, vec!["bitcoin", "cardano"]);
        assert_eq!(c.vs_currency, "eur");
        assert_eq!(c.variant, ExportVariant::Basic);
        assert_eq!(c.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(c.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn empty_coin_list_rejected() {
        let err = ReportConfig::from_toml("coins = []").unwrap_err();
        assert!(err.to_string().contains("coin list is empty"));
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(ReportConfig::from_toml("timeout_secs = 0").is_err());
    }

    #[test]
    fn unknown_variant_rejected() {
        assert!(ReportConfig::from_toml(r#"variant = "fancy""#).is_err());
        assert!("fancy".parse::<ExportVariant>().is_err());
        assert_eq!("BASIC".parse::<ExportVariant>().unwrap(), ExportVariant::Basic);
    }

    #[test]
    fn toml_roundtrip() {
        let c = ReportConfig::default();
        let text = toml::to_string_pretty(&c).unwrap();
        assert_eq!(ReportConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ReportConfig::from_file(Path::new("/nonexistent/cryptoreport.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
