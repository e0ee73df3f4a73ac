#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::LineItem;
use crate::pricing::{FinancialResult, PricingMode};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn priced_quote() -> Quote {
    let mut quote = Quote::new(
        "Maria da Silva".into(),
        "15th Birthday".into(),
        Some(date(2026, 11, 21)),
        PricingMode::FixedPrice,
    );
    quote.client_phone = "(11) 98765-4321".into();
    quote.guest_count = 80;
    quote.items = vec![
        LineItem::new("Buffet".into(), 80, dec!(30), Some(dec!(55))),
        LineItem::new("Decoration".into(), 1, dec!(900), Some(dec!(1600))),
    ];
    quote.snapshot = FinancialResult {
        fixed_cost_share: dec!(64.94),
        total_variable_cost: dec!(3300),
        total_sales: dec!(6000),
        net_profit: dec!(2635.06),
        margin_percent: dec!(43.92),
    };
    quote
}

#[test]
fn test_render_proposal_contents() {
    let text = render_proposal(&priced_quote(), date(2026, 10, 17)).unwrap();
    assert!(text.starts_with("EVENT PROPOSAL\n"));
    assert!(text.contains("Generated on: 17/10/2026"));
    assert!(text.contains("Client:       Maria da Silva"));
    assert!(text.contains("Event:        15th Birthday"));
    assert!(text.contains("Phone:        (11) 98765-4321"));
    assert!(text.contains("Event date:   21/11/2026"));
    assert!(text.contains("Guests:       80 guests"));
    assert!(text.contains("Buffet"));
    assert!(text.contains("Decoration"));
    assert!(text.contains("R$ 6.000,00"));
    assert!(text.contains("valid for 15 days"));
    assert!(text.contains("Thank you"));
}

#[test]
fn test_render_proposal_hides_costs() {
    let text = render_proposal(&priced_quote(), date(2026, 10, 17)).unwrap();
    assert!(!text.contains("3.300"));
    assert!(!text.contains("2.635"));
    assert!(!text.contains("64,94"));
}

#[test]
fn test_render_proposal_item_rows_align() {
    let text = render_proposal(&priced_quote(), date(2026, 10, 17)).unwrap();
    let buffet = text.lines().find(|l| l.starts_with("Buffet")).unwrap();
    let header = text.lines().find(|l| l.starts_with("ITEM DESCRIPTION")).unwrap();
    assert_eq!(buffet.chars().count(), header.chars().count());
    assert!(buffet.ends_with("80"));
}

#[test]
fn test_render_proposal_refuses_inconsistent_snapshot() {
    let mut quote = priced_quote();
    quote.snapshot.net_profit = dec!(1);
    let err = render_proposal(&quote, date(2026, 10, 17)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QuoteError>(),
        Some(QuoteError::InconsistentSnapshot(_))
    ));
}

#[test]
fn test_proposal_file_name() {
    let quote = priced_quote();
    assert_eq!(
        proposal_file_name(&quote, date(2026, 10, 17)),
        "Proposal_Maria_da_Silva_2026-11-21.txt"
    );
    let mut undated = quote;
    undated.event_date = None;
    assert_eq!(
        proposal_file_name(&undated, date(2026, 10, 17)),
        "Proposal_Maria_da_Silva_2026-10-17.txt"
    );
}

#[test]
fn test_write_proposal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_proposal(&priced_quote(), dir.path(), date(2026, 10, 17)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Proposal_Maria_da_Silva_2026-11-21.txt"
    );
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("GRAND TOTAL"));
}

#[test]
fn test_proposal_file_name_strips_path_characters() {
    let mut quote = priced_quote();
    quote.client_name = "../etc/José\\Ana: D'Ávila".into();
    assert_eq!(
        proposal_file_name(&quote, date(2026, 10, 17)),
        "Proposal____etc_José_Ana__D_Ávila_2026-11-21.txt"
    );

    let dir = tempfile::tempdir().unwrap();
    let path = write_proposal(&quote, dir.path(), date(2026, 10, 17)).unwrap();
    assert_eq!(path.parent().unwrap(), dir.path());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_proposal_inconsistent_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut quote = priced_quote();
    quote.snapshot.total_sales = dec!(1);
    assert!(write_proposal(&quote, dir.path(), date(2026, 10, 17)).is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
