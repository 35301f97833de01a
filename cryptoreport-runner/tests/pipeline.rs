//! End-to-end runs through `Pipeline` with canned and failing providers.

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;

use cryptoreport_core::{
    Clock, CoinGeckoProvider, ErrorKind, ExportVariant, FixedClock, MarketDataProvider,
    MarketRecord, ReportConfig, RunLog, StaticProvider,
};
use cryptoreport_runner::{ArtifactKind, Pipeline};

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
}

fn coin(id: &str, symbol: &str, cap: f64) -> serde_json::Value {
    json!({
        "id": id, "symbol": symbol, "name": id, "current_price": 1.0, "market_cap": cap,
        "price_change_percentage_24h": 0.5, "high_24h": 1.1, "low_24h": 0.9,
        "last_updated": "2024-05-01T11:00:00.000Z"
    })
}

fn records(values: Vec<serde_json::Value>) -> Vec<MarketRecord> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn config(root: &Path, variant: ExportVariant) -> ReportConfig {
    ReportConfig {
        output_dir: root.join("outputs"),
        log_dir: root.join("logs"),
        variant,
        ..ReportConfig::default()
    }
}

fn pipeline(config: ReportConfig, provider: Box<dyn MarketDataProvider>) -> Pipeline {
    let log = Arc::new(RunLog::open(&config.log_dir, clock()).unwrap().with_echo(false));
    Pipeline::new(config, provider, clock(), log)
}

fn log_messages(config: &ReportConfig) -> Vec<String> {
    fs::read_to_string(config.log_path())
        .unwrap()
        .lines()
        .map(|l| l[22..].to_string())
        .collect()
}

#[test]
fn four_coins_sorted_by_market_cap() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), ExportVariant::Extended);
    let provider = StaticProvider::new(records(vec![
        coin("bitcoin", "btc", 90e9),
        coin("ethereum", "eth", 5e9),
        coin("solana", "sol", 500e9),
        coin("dogecoin", "doge", 1e9),
    ]));

    let summary = pipeline(config.clone(), Box::new(provider)).run().unwrap();
    assert_eq!(summary.row_count, 4);
    assert_eq!(summary.artifacts.len(), 8);

    let csv_path = &summary
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Csv)
        .unwrap()
        .path;
    let csv = fs::read_to_string(csv_path).unwrap();
    let symbols: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(symbols, vec!["SOL", "BTC", "ETH", "DOGE"]);

    let messages = log_messages(&config);
    assert_eq!(messages.first().map(String::as_str), Some("Fetching API data..."));
    assert_eq!(messages[1], "Transforming data...");
    assert_eq!(messages.last().map(String::as_str), Some("Run finished successfully."));
    assert!(messages.iter().any(|m| m == "Export complete."));
    assert!(!messages.iter().any(|m| m.starts_with("ERROR:")));
}

#[test]
fn missing_column_fails_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), ExportVariant::Basic);
    let mut broken = coin("ethereum", "eth", 5e9);
    broken.as_object_mut().unwrap().remove("market_cap");
    let provider = StaticProvider::new(records(vec![coin("bitcoin", "btc", 90e9), broken]));

    let err = pipeline(config.clone(), Box::new(provider)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("market_cap"));
    assert!(!config.output_dir.exists());

    let errors: Vec<String> = log_messages(&config)
        .into_iter()
        .filter(|m| m.starts_with("ERROR: "))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("record 1"));
}

#[test]
fn empty_response_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), ExportVariant::Basic);
    let summary = pipeline(config, Box::new(StaticProvider::new(vec![])))
        .run()
        .unwrap();
    assert_eq!(summary.row_count, 0);
    let csv = fs::read_to_string(&summary.artifacts[0].path).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn timeout_logs_one_error_and_writes_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/v3/coins/markets", listener.local_addr().unwrap());
    // Accept and hold the connection without ever answering.
    let _silent = thread::spawn(move || {
        let held = listener.accept();
        thread::sleep(Duration::from_secs(3));
        drop(held);
    });

    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), ExportVariant::Extended);
    let provider = CoinGeckoProvider::builder()
        .base_url(url)
        .timeout(Duration::from_millis(300))
        .no_proxy()
        .build()
        .unwrap();

    let err = pipeline(config.clone(), Box::new(provider)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let messages = log_messages(&config);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], "Fetching API data...");
    assert!(messages[1].starts_with("ERROR: "));
    assert!(!config.output_dir.exists());
}
