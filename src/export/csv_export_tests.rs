#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::LineItem;
use crate::pricing::PricingMode;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn quote_on(client: &str, y: i32, m: u32, d: u32) -> Quote {
    let mut quote = Quote::new(
        client.into(),
        "Party".into(),
        NaiveDate::from_ymd_opt(y, m, d),
        PricingMode::CostPlusMargin(dec!(30)),
    );
    quote.items.push(LineItem::new("Cake".into(), 1, dec!(70), None));
    quote.snapshot.total_sales = dec!(100);
    quote.snapshot.total_variable_cost = dec!(70);
    quote.snapshot.net_profit = dec!(30);
    quote.snapshot.margin_percent = dec!(30);
    quote.created_at = "2026-01-01T00:00:00+00:00".into();
    quote
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_write_quotes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.csv");
    let quotes = vec![quote_on("Ana, Jr.", 2026, 3, 14)];
    assert_eq!(write_quotes_csv(&quotes, &path).unwrap(), 1);

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row[1], "Ana, Jr.");
    assert_eq!(row[4], "2026-03-14");
    assert_eq!(row[6], "Draft");
    assert_eq!(row[7], "cost-plus");
    assert_eq!(row[8], "30");
    assert_eq!(row[11], "100");
    assert_eq!(row[12], "30");
}

#[test]
fn test_export_quotes_filters_by_month() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_quote(&quote_on("March", 2026, 3, 1)).unwrap();
    db.save_quote(&quote_on("April", 2026, 4, 1)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("march.csv");
    let count = export_quotes(&db, &path, YearMonth::parse("2026-03")).unwrap();
    assert_eq!(count, 1);
    let rows = read_rows(&path);
    assert_eq!(rows[0][1], "March");

    let all = dir.path().join("all.csv");
    assert_eq!(export_quotes(&db, &all, None).unwrap(), 2);
}

#[test]
fn test_export_quotes_empty_writes_no_file() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("none.csv");
    assert_eq!(export_quotes(&db, &path, None).unwrap(), 0);
    assert!(!path.exists());
}
