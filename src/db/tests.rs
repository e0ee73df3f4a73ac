#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn ym(s: &str) -> YearMonth {
    YearMonth::parse(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_quote() -> Quote {
    let mut quote = Quote::new(
        "Ana Souza".into(),
        "Wedding".into(),
        Some(date(2026, 3, 14)),
        PricingMode::CostPlusMargin(dec!(25)),
    );
    quote.client_phone = "555-0101".into();
    quote.guest_count = 120;
    quote.created_at = "2026-02-01T10:00:00+00:00".into();
    quote.items = vec![
        LineItem::new("Buffet".into(), 120, dec!(35.50), Some(dec!(60))),
        LineItem::new("DJ".into(), 1, dec!(400), None),
    ];
    quote.snapshot = FinancialResult {
        fixed_cost_share: dec!(64.94),
        total_variable_cost: dec!(4660),
        total_sales: dec!(6299.92),
        net_profit: dec!(1574.98),
        margin_percent: dec!(25),
    };
    quote
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_fixed_costs().unwrap().is_empty());
    assert!(db.get_catalog_items().unwrap().is_empty());
    assert!(db.get_quotes(None).unwrap().is_empty());
}

#[test]
fn test_reopen_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_fixed_cost(&FixedCost::recurring("Rent".into(), dec!(1000)))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let costs = db.get_fixed_costs().unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].amount, dec!(1000));
}

// ── Parameters ────────────────────────────────────────────────

#[test]
fn test_parameters_default_when_unsaved() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_parameters().unwrap(), BusinessParameters::default());
}

#[test]
fn test_parameters_upsert() {
    let db = Database::open_in_memory().unwrap();
    db.save_parameters(&BusinessParameters::new(dec!(55.5), 20))
        .unwrap();
    db.save_parameters(&BusinessParameters::new(dec!(80), 25))
        .unwrap();
    let p = db.get_parameters().unwrap();
    assert_eq!(p.occupancy_rate, dec!(80));
    assert_eq!(p.working_days_per_month, 25);
}

// ── Fixed costs ───────────────────────────────────────────────

#[test]
fn test_fixed_cost_crud() {
    let db = Database::open_in_memory().unwrap();
    let rent = db
        .insert_fixed_cost(&FixedCost::recurring("Rent".into(), dec!(1000)))
        .unwrap();
    db.insert_fixed_cost(&FixedCost::for_month(
        "Extra staff".into(),
        dec!(450.75),
        ym("2026-03"),
    ))
    .unwrap();

    let costs = db.get_fixed_costs().unwrap();
    assert_eq!(costs.len(), 2);
    // Dated costs sort first, recurring last
    assert_eq!(costs[0].scope, CostScope::Period(ym("2026-03")));
    assert_eq!(costs[0].amount, dec!(450.75));
    assert_eq!(costs[1].scope, CostScope::Recurring);

    assert!(db.delete_fixed_cost(rent).unwrap());
    assert!(!db.delete_fixed_cost(rent).unwrap());
    assert_eq!(db.get_fixed_costs().unwrap().len(), 1);
}

// ── Catalog ───────────────────────────────────────────────────

#[test]
fn test_catalog_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_catalog_item(&CatalogItem::new("Buffet".into(), dec!(35), dec!(60)))
        .unwrap();
    db.insert_catalog_item(&CatalogItem::new("Balloons".into(), dec!(0.5), dec!(2)))
        .unwrap();

    let items = db.get_catalog_items().unwrap();
    let names: Vec<&str> = items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Balloons", "Buffet"]);

    let buffet = db.get_catalog_item_by_id(id).unwrap().unwrap();
    assert_eq!(buffet.default_unit_price, dec!(60));

    assert!(db.delete_catalog_item(id).unwrap());
    assert!(db.get_catalog_item_by_id(id).unwrap().is_none());
}

// ── Quotes ────────────────────────────────────────────────────

#[test]
fn test_quote_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let quote = sample_quote();
    let id = db.save_quote(&quote).unwrap();

    let loaded = db.get_quote_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.client_name, "Ana Souza");
    assert_eq!(loaded.client_phone, "555-0101");
    assert_eq!(loaded.event_date, Some(date(2026, 3, 14)));
    assert_eq!(loaded.guest_count, 120);
    assert_eq!(loaded.status, QuoteStatus::Draft);
    assert_eq!(loaded.pricing_mode, PricingMode::CostPlusMargin(dec!(25)));
    assert_eq!(loaded.snapshot, quote.snapshot);
    assert_eq!(loaded.items, quote.items);
    assert_eq!(loaded.created_at, quote.created_at);
}

#[test]
fn test_quote_without_date_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let mut quote = sample_quote();
    quote.event_date = None;
    quote.pricing_mode = PricingMode::FixedPrice;
    let id = db.save_quote(&quote).unwrap();

    let loaded = db.get_quote_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.event_date, None);
    assert_eq!(loaded.pricing_mode, PricingMode::FixedPrice);
}

#[test]
fn test_quote_update_replaces_items_and_keeps_created_at() {
    let mut db = Database::open_in_memory().unwrap();
    let mut quote = sample_quote();
    let id = db.save_quote(&quote).unwrap();

    quote.id = Some(id);
    quote.items.truncate(1);
    quote.items.push(LineItem::new("Cake".into(), 2, dec!(80), Some(dec!(150))));
    quote.created_at = "ignored on update".into();
    quote.event_name = "Wedding reception".into();
    assert_eq!(db.save_quote(&quote).unwrap(), id);

    let loaded = db.get_quote_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.event_name, "Wedding reception");
    let names: Vec<&str> = loaded.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Buffet", "Cake"]);
    assert_eq!(loaded.created_at, "2026-02-01T10:00:00+00:00");
}

#[test]
fn test_save_unknown_quote_id_fails() {
    let mut db = Database::open_in_memory().unwrap();
    let mut quote = sample_quote();
    quote.id = Some(404);
    let err = db.save_quote(&quote).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QuoteError>(),
        Some(QuoteError::NotFound(404))
    ));
    assert!(db.get_quotes(None).unwrap().is_empty());
}

#[test]
fn test_duplicate_item_keys_roll_back_whole_save() {
    let mut db = Database::open_in_memory().unwrap();
    let mut quote = sample_quote();
    let dup = quote.items[0].clone();
    quote.items.push(dup);
    assert!(db.save_quote(&quote).is_err());
    assert!(db.get_quotes(None).unwrap().is_empty());
}

#[test]
fn test_delete_quote_cascades_items() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db.save_quote(&sample_quote()).unwrap();
    assert!(db.delete_quote(id).unwrap());
    assert!(db.get_quote_by_id(id).unwrap().is_none());
    assert!(db.get_quote_items(id).unwrap().is_empty());
    assert!(!db.delete_quote(id).unwrap());
}

#[test]
fn test_update_quote_status() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db.save_quote(&sample_quote()).unwrap();
    assert!(db.update_quote_status(id, QuoteStatus::Scheduled).unwrap());
    assert_eq!(
        db.get_quote_by_id(id).unwrap().unwrap().status,
        QuoteStatus::Scheduled
    );
    assert!(!db.update_quote_status(999, QuoteStatus::Completed).unwrap());
}

#[test]
fn test_get_quotes_month_filter_and_order() {
    let mut db = Database::open_in_memory().unwrap();
    let mut late = sample_quote();
    late.event_date = Some(date(2026, 3, 28));
    late.event_name = "Late".into();
    let mut early = sample_quote();
    early.event_date = Some(date(2026, 3, 2));
    early.event_name = "Early".into();
    let mut april = sample_quote();
    april.event_date = Some(date(2026, 4, 1));
    let mut undated = sample_quote();
    undated.event_date = None;
    undated.event_name = "Undated".into();

    for q in [&late, &undated, &april, &early] {
        db.save_quote(q).unwrap();
    }

    let march = db.get_quotes(Some(ym("2026-03"))).unwrap();
    let names: Vec<&str> = march.iter().map(|q| q.event_name.as_str()).collect();
    assert_eq!(names, vec!["Early", "Late"]);
    assert_eq!(march[0].items.len(), 2);

    let all = db.get_quotes(None).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all.last().unwrap().event_name, "Undated");
}

// ── Analytics ─────────────────────────────────────────────────

#[test]
fn test_quote_stats() {
    let mut db = Database::open_in_memory().unwrap();
    let statuses = [
        (QuoteStatus::Completed, date(2026, 3, 5), dec!(1000.10)),
        (QuoteStatus::Completed, date(2026, 3, 20), dec!(500.20)),
        (QuoteStatus::Completed, date(2026, 4, 2), dec!(9999)),
        (QuoteStatus::Scheduled, date(2026, 3, 25), dec!(700)),
        (QuoteStatus::Draft, date(2026, 3, 26), dec!(300)),
        (QuoteStatus::Declined, date(2026, 3, 27), dec!(300)),
    ];
    for (status, d, sales) in statuses {
        let mut q = sample_quote();
        q.status = status;
        q.event_date = Some(d);
        q.snapshot.total_sales = sales;
        db.save_quote(&q).unwrap();
    }

    let stats = db.get_quote_stats(ym("2026-03")).unwrap();
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.scheduled, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.declined, 1);
    assert_eq!(stats.revenue, dec!(1500.30));
}

#[test]
fn test_upcoming_events_only_scheduled_from_date() {
    let mut db = Database::open_in_memory().unwrap();
    for (status, d, name) in [
        (QuoteStatus::Scheduled, date(2026, 5, 10), "Later"),
        (QuoteStatus::Scheduled, date(2026, 5, 1), "Sooner"),
        (QuoteStatus::Scheduled, date(2026, 4, 1), "Past"),
        (QuoteStatus::Draft, date(2026, 5, 2), "Draft"),
    ] {
        let mut q = sample_quote();
        q.status = status;
        q.event_date = Some(d);
        q.event_name = name.into();
        db.save_quote(&q).unwrap();
    }

    let upcoming = db.get_upcoming_events(date(2026, 4, 15), 5).unwrap();
    let names: Vec<&str> = upcoming.iter().map(|q| q.event_name.as_str()).collect();
    assert_eq!(names, vec!["Sooner", "Later"]);
    assert_eq!(db.get_upcoming_events(date(2026, 4, 15), 1).unwrap().len(), 1);
}
