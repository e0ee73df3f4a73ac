#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::pricing::PricingMode;

fn ym(s: &str) -> YearMonth {
    YearMonth::parse(s).unwrap()
}

// ── YearMonth ─────────────────────────────────────────────────

#[test]
fn test_year_month_parse() {
    let m = ym("2026-03");
    assert_eq!(m.to_string(), "2026-03");
    assert_eq!(ym("2026-3"), m);
    assert_eq!(ym(" 2026-03 "), m);
}

#[test]
fn test_year_month_parse_invalid() {
    assert!(YearMonth::parse("2026-13").is_none());
    assert!(YearMonth::parse("2026-00").is_none());
    assert!(YearMonth::parse("26-03").is_none());
    assert!(YearMonth::parse("2026").is_none());
    assert!(YearMonth::parse("march").is_none());
    assert!(YearMonth::parse("").is_none());
}

#[test]
fn test_year_month_display_pads() {
    assert_eq!(ym("2026-3").to_string(), "2026-03");
    assert_eq!(YearMonth::new(987, 11).unwrap().to_string(), "0987-11");
}

#[test]
fn test_year_month_of_date() {
    let d = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    let m = YearMonth::of(d);
    assert_eq!(m, ym("2026-03"));
    assert_ne!(m, YearMonth::of(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
    assert_eq!(m.first_day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
}

#[test]
fn test_year_month_navigation_wraps_years() {
    assert_eq!(ym("2025-12").next(), ym("2026-01"));
    assert_eq!(ym("2026-01").prev(), ym("2025-12"));
    assert_eq!(ym("2026-06").next().prev(), ym("2026-06"));
}

#[test]
fn test_year_month_from_str_error() {
    let err = "nope".parse::<YearMonth>().unwrap_err();
    assert!(err.to_string().contains("YYYY-MM"));
}

// ── CostScope / FixedCost ─────────────────────────────────────

#[test]
fn test_cost_scope_parse() {
    assert_eq!(CostScope::parse(""), Some(CostScope::Recurring));
    assert_eq!(CostScope::parse("Recurring"), Some(CostScope::Recurring));
    assert_eq!(CostScope::parse("2026-02"), Some(CostScope::Period(ym("2026-02"))));
    assert_eq!(CostScope::parse("feb"), None);
}

#[test]
fn test_cost_scope_applies_to() {
    let feb = CostScope::Period(ym("2026-02"));
    assert!(feb.applies_to(Some(ym("2026-02"))));
    assert!(!feb.applies_to(Some(ym("2026-03"))));
    assert!(!feb.applies_to(None));
    assert!(CostScope::Recurring.applies_to(None));
    assert!(CostScope::Recurring.applies_to(Some(ym("1999-01"))));
}

#[test]
fn test_cost_scope_display() {
    assert_eq!(CostScope::Recurring.to_string(), "Recurring");
    assert_eq!(CostScope::Period(ym("2026-02")).to_string(), "2026-02");
}

#[test]
fn test_group_by_scope_orders_newest_first_recurring_last() {
    let costs = vec![
        FixedCost::recurring("Rent".into(), dec!(1000)),
        FixedCost::for_month("Jan staff".into(), dec!(200), ym("2026-01")),
        FixedCost::for_month("Mar staff".into(), dec!(300), ym("2026-03")),
        FixedCost::for_month("Mar repairs".into(), dec!(50), ym("2026-03")),
        FixedCost::recurring("Insurance".into(), dec!(80)),
    ];
    let groups = FixedCost::group_by_scope(&costs);
    let scopes: Vec<CostScope> = groups.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        scopes,
        vec![
            CostScope::Period(ym("2026-03")),
            CostScope::Period(ym("2026-01")),
            CostScope::Recurring,
        ]
    );
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(FixedCost::total(&groups[0].1), dec!(350));
    assert_eq!(FixedCost::total(&groups[2].1), dec!(1080));
}

#[test]
fn test_group_by_scope_empty() {
    assert!(FixedCost::group_by_scope(&[]).is_empty());
}

// ── BusinessParameters ────────────────────────────────────────

#[test]
fn test_parameters_default() {
    let p = BusinessParameters::default();
    assert_eq!(p.occupancy_rate, dec!(70));
    assert_eq!(p.working_days_per_month, 22);
    assert_eq!(p.expected_events_per_month(), dec!(15.4));
    assert!(p.has_capacity());
}

#[test]
fn test_parameters_without_capacity() {
    assert!(!BusinessParameters::new(Decimal::ZERO, 22).has_capacity());
    assert!(!BusinessParameters::new(dec!(70), 0).has_capacity());
    let both_negative = BusinessParameters::new(dec!(-50), -20);
    assert_eq!(both_negative.expected_events_per_month(), Decimal::ZERO);
    assert!(!both_negative.has_capacity());
    assert_eq!(
        BusinessParameters::new(Decimal::MAX, i32::MAX).expected_events_per_month(),
        Decimal::ZERO
    );
}

// ── CatalogItem / LineItem ────────────────────────────────────

#[test]
fn test_line_item_from_catalog() {
    let mut template = CatalogItem::new("Buffet".into(), dec!(35), dec!(60));
    template.id = Some(7);
    let item = LineItem::from_catalog(&template);
    assert_eq!(item.name, "Buffet");
    assert_eq!(item.quantity, 1);
    assert_eq!(item.unit_cost, dec!(35));
    assert_eq!(item.unit_price, Some(dec!(60)));
    assert!(!item.id.is_empty());
}

#[test]
fn test_line_item_ids_are_unique() {
    let a = LineItem::new("A".into(), 1, dec!(1), None);
    let b = LineItem::new("A".into(), 1, dec!(1), None);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_line_item_totals() {
    let item = LineItem::new("Chairs".into(), 40, dec!(1.25), Some(dec!(3)));
    assert_eq!(item.total_cost(), dec!(50));
    assert_eq!(item.total_price(), Some(dec!(120)));
    let unpriced = LineItem::new("Chairs".into(), 40, dec!(1.25), None);
    assert_eq!(unpriced.total_price(), None);
}

#[test]
fn test_catalog_find() {
    let mut a = CatalogItem::new("Buffet".into(), dec!(35), dec!(60));
    a.id = Some(1);
    let mut b = CatalogItem::new("DJ".into(), dec!(400), dec!(900));
    b.id = Some(2);
    let items = vec![a, b];
    assert_eq!(CatalogItem::find_by_name(&items, "dj").unwrap().id, Some(2));
    assert!(CatalogItem::find_by_name(&items, "Balloons").is_none());
}

// ── Quote ─────────────────────────────────────────────────────

#[test]
fn test_quote_status_parse() {
    assert_eq!(QuoteStatus::parse("draft"), Some(QuoteStatus::Draft));
    assert_eq!(QuoteStatus::parse("SCHEDULED"), Some(QuoteStatus::Scheduled));
    assert_eq!(QuoteStatus::parse("completed"), Some(QuoteStatus::Completed));
    assert_eq!(QuoteStatus::parse("declined"), Some(QuoteStatus::Declined));
    assert_eq!(QuoteStatus::parse("pending"), Some(QuoteStatus::Draft));
    assert_eq!(QuoteStatus::parse("cancelled"), None);
}

#[test]
fn test_quote_status_roundtrip() {
    for s in QuoteStatus::all() {
        assert_eq!(QuoteStatus::parse(s.as_str()), Some(*s), "Roundtrip failed for {s}");
    }
    assert_eq!(QuoteStatus::default(), QuoteStatus::Draft);
}

#[test]
fn test_quote_new_defaults() {
    let d = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    let quote = Quote::new("Ana".into(), "Wedding".into(), Some(d), PricingMode::FixedPrice);
    assert!(quote.id.is_none());
    assert_eq!(quote.status, QuoteStatus::Draft);
    assert_eq!(quote.guest_count, 0);
    assert!(quote.items.is_empty());
    assert_eq!(quote.snapshot.total_sales, Decimal::ZERO);
    assert_eq!(quote.event_month(), Some(ym("2026-03")));
    assert_eq!(quote.label(), "Wedding (Ana)");
}

#[test]
fn test_quote_find_and_remove_item() {
    let mut quote = Quote::new("Ana".into(), "Wedding".into(), None, PricingMode::FixedPrice);
    let keep = LineItem::new("Cake".into(), 1, dec!(80), Some(dec!(150)));
    let drop = LineItem::new("Balloons".into(), 50, dec!(0.5), Some(dec!(2)));
    let drop_id = drop.id.clone();
    quote.items.push(keep);
    quote.items.push(drop);

    assert_eq!(quote.find_item(&drop_id).unwrap().name, "Balloons");
    let removed = quote.remove_item(&drop_id).unwrap();
    assert_eq!(removed.name, "Balloons");
    assert_eq!(quote.items.len(), 1);
    assert!(quote.remove_item(&drop_id).is_none());
    assert_eq!(quote.event_month(), None);
}

#[test]
fn test_quote_status_is_open() {
    assert!(QuoteStatus::Draft.is_open());
    assert!(QuoteStatus::Scheduled.is_open());
    assert!(!QuoteStatus::Completed.is_open());
    assert!(!QuoteStatus::Declined.is_open());
}
