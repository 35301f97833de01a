//! Market-data acquisition

pub mod coingecko;
pub mod fetch;
pub mod provider;

pub use coingecko::{CoinGeckoProvider, CoinGeckoProviderBuilder};
pub use fetch::Fetcher;
pub use provider::{MarketDataProvider, MarketQuery, StaticProvider};
