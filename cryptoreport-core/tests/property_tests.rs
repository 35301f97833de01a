//! Property tests for transform invariants.
//!
//! Uses proptest to verify:
//! 1. Shape: N records in, N rows out, symbols upper-cased
//! 2. Ordering: market cap never increases down the table
//! 3. Stability: equal market caps keep their input order

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

use cryptoreport_core::transform::transform_records;
use cryptoreport_core::{MarketRecord, ReportRow};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbol() -> impl Strategy<Value = String> {
    "[a-zA-Z]{2,6}"
}

/// Market caps drawn from a small set so ties are common.
fn arb_market_cap() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(1.0e9),
        Just(5.0e9),
        Just(9.0e10),
        Just(5.0e11),
        (1.0..1.0e12_f64).prop_map(|c| c.round()),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<MarketRecord>> {
    prop::collection::vec((arb_symbol(), arb_market_cap()), 0..24).prop_map(|coins| {
        coins
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, cap))| {
                serde_json::from_value(json!({
                    "id": format!("coin-{i}"),
                    "symbol": symbol,
                    "name": format!("Coin {i}"),
                    "current_price": 1.0 + i as f64,
                    "market_cap": cap,
                    "price_change_percentage_24h": null,
                    "high_24h": 2.0,
                    "low_24h": 0.5,
                    "last_updated": "2024-05-01T00:00:00Z"
                }))
                .unwrap()
            })
            .collect()
    })
}

fn input_position(row: &ReportRow) -> usize {
    row.id.trim_start_matches("coin-").parse().unwrap()
}

proptest! {
    #[test]
    fn one_row_per_record_with_upper_symbols(records in arb_records()) {
        let generated = Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap();
        let rows = transform_records(&records, generated).unwrap();

        prop_assert_eq!(rows.len(), records.len());
        for row in &rows {
            prop_assert_eq!(row.symbol.clone(), row.symbol.to_uppercase());
            prop_assert_eq!(row.report_generated_at, generated);
            let source = &records[input_position(row)];
            prop_assert_eq!(row.symbol.clone(), source.cell_text("symbol").to_uppercase());
        }
    }

    #[test]
    fn market_cap_never_increases(records in arb_records()) {
        let rows = transform_records(&records, Utc::now()).unwrap();
        for pair in rows.windows(2) {
            prop_assert!(pair[0].market_cap >= pair[1].market_cap);
        }
    }

    #[test]
    fn ties_preserve_input_order(records in arb_records()) {
        let rows = transform_records(&records, Utc::now()).unwrap();
        for pair in rows.windows(2) {
            if pair[0].market_cap == pair[1].market_cap {
                prop_assert!(input_position(&pair[0]) < input_position(&pair[1]));
            }
        }
    }
}
