//! CSV and JSON renderings of the report rows.

use cryptoreport_core::{ReportError, ReportRow};

/// One header line of column names, then one line per row. Timestamps are
/// RFC 3339; absent values are empty fields.
pub fn render_csv(rows: &[ReportRow]) -> Result<String, ReportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(ReportRow::COLUMNS)
        .map_err(|e| ReportError::render("CSV", e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| ReportError::render("CSV", e))?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ReportError::render("CSV", e.error()))?;
    String::from_utf8(data).map_err(|e| ReportError::render("CSV", e))
}

/// Parse a report CSV produced by `render_csv`.
pub fn read_csv(text: &str) -> Result<Vec<ReportRow>, ReportError> {
    csv::Reader::from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<ReportRow>, _>>()
        .map_err(|e| ReportError::render("CSV", format!("unreadable report CSV: {e}")))
}

/// Pretty-printed array of row objects in column order.
pub fn render_json(rows: &[ReportRow]) -> Result<String, ReportError> {
    serde_json::to_string_pretty(rows).map_err(|e| ReportError::render("JSON", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_rows() -> Vec<ReportRow> {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
        vec![
            ReportRow {
                id: "solana".into(),
                symbol: "SOL".into(),
                name: "Solana".into(),
                current_price: 142.37,
                market_cap: 5.0e11,
                price_change_percentage_24h: Some(3.1),
                high_24h: Some(145.0),
                low_24h: Some(138.2),
                last_updated: ts,
                report_generated_at: ts,
            },
            ReportRow {
                id: "wrapped, \"quoted\" coin".into(),
                symbol: "WQC".into(),
                name: "Wrapped Coin".into(),
                current_price: 0.000123,
                market_cap: 1.0e6,
                price_change_percentage_24h: None,
                high_24h: None,
                low_24h: None,
                last_updated: ts,
                report_generated_at: ts,
            },
        ]
    }

    #[test]
    fn csv_header_is_column_list() {
        let csv = render_csv(&sample_rows()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, ReportRow::COLUMNS.join(","));
    }

    #[test]
    fn csv_has_one_line_per_row() {
        let csv = render_csv(&sample_rows()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().nth(1).unwrap().starts_with("solana,SOL,Solana,142.37,"));
    }

    #[test]
    fn csv_empty_rows_still_has_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn csv_reads_back_equal() {
        let rows = sample_rows();
        let parsed = read_csv(&render_csv(&rows).unwrap()).unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn unreadable_csv_is_a_render_error() {
        let err = read_csv("id,symbol\nbitcoin,BTC,extra,fields\n").unwrap_err();
        assert_eq!(err.kind(), cryptoreport_core::ErrorKind::Render);
    }

    #[test]
    fn json_is_array_in_row_order() {
        let json = render_json(&sample_rows()).unwrap();
        assert!(json.contains("\n  {"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["symbol"], "SOL");
        assert_eq!(arr[1]["high_24h"], serde_json::Value::Null);
        assert_eq!(arr[0]["last_updated"], "2024-05-01T12:34:56Z");
    }
}
