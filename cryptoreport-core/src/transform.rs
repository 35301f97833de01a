//! Transform stage: project raw records onto `ReportRow`.
//!
//! Steps, in order:
//! 1. project every record onto the report columns (missing field → schema error)
//! 2. upper-case the symbol
//! 3. parse `last_updated` as RFC 3339 (failure → format error)
//! 4. stamp all rows with one generation timestamp
//! 5. stable sort by market cap, descending

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clock::Clock;
use crate::domain::{MarketRecord, RawTable, ReportRow};
use crate::error::ReportError;
use crate::runlog::RunLog;

/// Provider fields every record must carry.
pub const SOURCE_COLUMNS: [&str; 9] = [
    "id",
    "symbol",
    "name",
    "current_price",
    "market_cap",
    "price_change_percentage_24h",
    "high_24h",
    "low_24h",
    "last_updated",
];

/// Output of the transform stage: the untouched payload and the cleaned rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub raw: RawTable,
    pub rows: Vec<ReportRow>,
}

pub struct Transformer {
    clock: Arc<dyn Clock>,
    log: Arc<RunLog>,
}

impl Transformer {
    pub fn new(clock: Arc<dyn Clock>, log: Arc<RunLog>) -> Self {
        Self { clock, log }
    }

    pub fn transform(&self, records: Vec<MarketRecord>) -> Result<Transformed, ReportError> {
        self.log.log("Transforming data...")?;
        let generated_at = self.clock.now();
        let rows = transform_records(&records, generated_at)?;
        tracing::debug!(rows = rows.len(), "transformed market records");
        Ok(Transformed {
            raw: RawTable::new(records),
            rows,
        })
    }
}

/// Pure transform over a record slice with a fixed generation time.
pub fn transform_records(
    records: &[MarketRecord],
    generated_at: DateTime<Utc>,
) -> Result<Vec<ReportRow>, ReportError> {
    let projected = records
        .iter()
        .enumerate()
        .map(|(index, record)| Projection::of(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = projected
        .into_iter()
        .map(|p| p.into_row(generated_at))
        .collect::<Result<Vec<_>, _>>()?;

    sort_by_market_cap(&mut rows);
    Ok(rows)
}

/// Market cap descending; equal caps keep input order.
pub fn sort_by_market_cap(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
}

/// Borrowed view of the report columns of one record.
struct Projection<'a> {
    index: usize,
    values: [&'a Value; 9],
}

impl<'a> Projection<'a> {
    fn of(index: usize, record: &'a MarketRecord) -> Result<Self, ReportError> {
        let mut values = [&Value::Null; 9];
        for (slot, field) in values.iter_mut().zip(SOURCE_COLUMNS) {
            *slot = record
                .get(field)
                .ok_or(ReportError::MissingField { index, field })?;
        }
        Ok(Self { index, values })
    }

    fn into_row(self, generated_at: DateTime<Utc>) -> Result<ReportRow, ReportError> {
        let [id, symbol, name, price, cap, change, high, low, updated] = self.values;
        let i = self.index;
        Ok(ReportRow {
            id: string_field(i, "id", id)?,
            symbol: string_field(i, "symbol", symbol)?.to_uppercase(),
            name: string_field(i, "name", name)?,
            current_price: number_field(i, "current_price", price)?,
            market_cap: number_field(i, "market_cap", cap)?,
            price_change_percentage_24h: optional_number_field(
                i,
                "price_change_percentage_24h",
                change,
            )?,
            high_24h: optional_number_field(i, "high_24h", high)?,
            low_24h: optional_number_field(i, "low_24h", low)?,
            last_updated: timestamp_field(i, "last_updated", updated)?,
            report_generated_at: generated_at,
        })
    }
}

fn invalid(index: usize, field: &'static str, reason: String) -> ReportError {
    ReportError::InvalidValue {
        index,
        field,
        reason,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_field(index: usize, field: &'static str, value: &Value) -> Result<String, ReportError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid(index, field, format!("expected string, got {}", type_name(value))))
}

fn number_field(index: usize, field: &'static str, value: &Value) -> Result<f64, ReportError> {
    value
        .as_f64()
        .ok_or_else(|| invalid(index, field, format!("expected number, got {}", type_name(value))))
}

fn optional_number_field(
    index: usize,
    field: &'static str,
    value: &Value,
) -> Result<Option<f64>, ReportError> {
    if value.is_null() {
        return Ok(None);
    }
    number_field(index, field, value).map(Some)
}

fn timestamp_field(
    index: usize,
    field: &'static str,
    value: &Value,
) -> Result<DateTime<Utc>, ReportError> {
    let text = value.as_str().ok_or_else(|| {
        invalid(
            index,
            field,
            format!("expected timestamp string, got {}", type_name(value)),
        )
    })?;
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| invalid(index, field, format!("unparseable timestamp '{text}': {e}")))
}
