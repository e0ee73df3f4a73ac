#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flag_lookup() {
    let a = args(&["--client", "Ana", "--guests", "80"]);
    assert_eq!(flag(&a, "--client"), Some("Ana"));
    assert_eq!(flag(&a, "--guests"), Some("80"));
    assert_eq!(flag(&a, "--phone"), None);
}

#[test]
fn test_positional_skips_flag_values() {
    let a = args(&["7", "--month", "2026-03", "out.csv", "--all"]);
    assert_eq!(positional(&a), vec!["7", "out.csv"]);
}

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
}

#[test]
fn test_cli_quote_flow() {
    let mut db = Database::open_in_memory().unwrap();
    as_cli(&args(&["eq", "costs", "add", "Rent", "1000"]), &mut db).unwrap();
    as_cli(&args(&["eq", "params", "set", "50", "20"]), &mut db).unwrap();
    as_cli(
        &args(&["eq", "quote", "new", "--client", "Ana", "--event", "Wedding", "--date", "2026-03-14"]),
        &mut db,
    )
    .unwrap();
    as_cli(&args(&["eq", "quote", "add-item", "1", "Buffet", "2", "5", "50"]), &mut db).unwrap();

    let quote = db.get_quote_by_id(1).unwrap().unwrap();
    assert_eq!(quote.items.len(), 1);
    assert_eq!(quote.snapshot.total_sales, dec!(100));
    assert_eq!(quote.snapshot.fixed_cost_share, dec!(100));

    as_cli(&args(&["eq", "quote", "remove-item", "1", "buffet"]), &mut db).unwrap();
    assert!(db.get_quote_by_id(1).unwrap().unwrap().items.is_empty());
}

#[test]
fn test_cli_rejects_bad_params() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(as_cli(&args(&["eq", "params", "set", "150", "20"]), &mut db).is_err());
    assert!(as_cli(&args(&["eq", "quote", "show", "9"]), &mut db).is_err());
    assert!(as_cli(&args(&["eq", "bogus"]), &mut db).is_err());
}
