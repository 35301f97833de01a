//! Market-data provider trait and request description.
//!
//! The `MarketDataProvider` trait abstracts over data sources so the pipeline
//! can run against CoinGecko in production and a canned payload in tests.

use crate::config::ReportConfig;
use crate::domain::MarketRecord;
use crate::error::ReportError;

/// Ordering key requested from the provider.
pub const ORDER_MARKET_CAP_DESC: &str = "market_cap_desc";

/// Everything needed to request one page of market data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    pub vs_currency: String,
    pub ids: Vec<String>,
    pub order: String,
    pub per_page: usize,
    pub page: u32,
    pub sparkline: bool,
}

impl MarketQuery {
    /// Single page covering the configured universe.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            vs_currency: config.vs_currency.clone(),
            ids: config.coins.clone(),
            order: ORDER_MARKET_CAP_DESC.to_string(),
            per_page: config.per_page(),
            page: 1,
            sparkline: false,
        }
    }

    /// Query-string pairs in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("ids", self.ids.join(",")),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", self.sparkline.to_string()),
        ]
    }
}

/// Trait for market-data sources.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the market records for a query. Transport and status failures
    /// map to the transport class of `ReportError`.
    fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<MarketRecord>, ReportError>;
}

/// Provider that returns a fixed payload. Useful for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<MarketRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<MarketRecord>) -> Self {
        Self { records }
    }

    /// Parse a provider-shaped JSON array.
    pub fn from_json(body: &str) -> Result<Self, ReportError> {
        let records = serde_json::from_str(body).map_err(|e| ReportError::Decode(e.to_string()))?;
        Ok(Self { records })
    }
}

impl MarketDataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_markets(&self, _query: &MarketQuery) -> Result<Vec<MarketRecord>, ReportError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_provider_contract() {
        let q = MarketQuery::from_config(&ReportConfig::default());
        let params = q.params();
        assert_eq!(
            params,
            vec![
                ("vs_currency", "usd".to_string()),
                ("ids", "bitcoin,ethereum,solana,dogecoin".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", "4".to_string()),
                ("page", "1".to_string()),
                ("sparkline", "false".to_string()),
            ]
        );
    }

    #[test]
    fn per_page_tracks_universe_size() {
        let config = ReportConfig {
            coins: vec!["bitcoin".into()],
            ..ReportConfig::default()
        };
        assert_eq!(MarketQuery::from_config(&config).per_page, 1);
    }

    #[test]
    fn static_provider_decodes_array() {
        let p = StaticProvider::from_json(r#"[{"id":"bitcoin"},{"id":"ethereum"}]"#).unwrap();
        let records = p.fetch_markets(&MarketQuery::from_config(&ReportConfig::default())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].cell_text("id"), "ethereum");
    }

    #[test]
    fn static_provider_rejects_non_array() {
        let err = StaticProvider::from_json(r#"{"error":"nope"}"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
    }
}
