//! Domain types: raw provider records and the projected report row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One coin entry exactly as the provider returned it.
///
/// Field order is the provider's order; nothing is dropped or coerced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketRecord(Map<String, Value>);

impl MarketRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Display text for one field; missing and null fields are empty.
    pub fn cell_text(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for MarketRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The untouched provider payload for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    records: Vec<MarketRecord>,
}

impl RawTable {
    pub fn new(records: Vec<MarketRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of all record keys in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for record in &self.records {
            for key in record.fields().keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
        columns
    }
}

/// One cleaned row of the report. Field order is the column order of every
/// tabular artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub price_change_percentage_24h: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub last_updated: DateTime<Utc>,
    pub report_generated_at: DateTime<Utc>,
}

impl ReportRow {
    pub const COLUMNS: [&'static str; 10] = [
        "id",
        "symbol",
        "name",
        "current_price",
        "market_cap",
        "price_change_percentage_24h",
        "high_24h",
        "low_24h",
        "last_updated",
        "report_generated_at",
    ];

    /// Human-readable cell values in `COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.symbol.clone(),
            self.name.clone(),
            self.current_price.to_string(),
            self.market_cap.to_string(),
            opt_cell(self.price_change_percentage_24h),
            opt_cell(self.high_24h),
            opt_cell(self.low_24h),
            timestamp_cell(&self.last_updated),
            timestamp_cell(&self.report_generated_at),
        ]
    }
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn timestamp_cell(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
