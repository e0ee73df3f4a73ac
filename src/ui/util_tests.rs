#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_accented() {
    assert_eq!(truncate("Confraternização", 8), "Confrat…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

// ── format_currency ───────────────────────────────────────────

#[test]
fn test_format_currency_basic() {
    assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
}

#[test]
fn test_format_currency_small() {
    assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
    assert_eq!(format_currency(dec!(5)), "R$ 5,00");
}

#[test]
fn test_format_currency_zero() {
    assert_eq!(format_currency(dec!(0)), "R$ 0,00");
}

#[test]
fn test_format_currency_negative() {
    assert_eq!(format_currency(dec!(-1234.56)), "-R$ 1.234,56");
}

#[test]
fn test_format_currency_millions() {
    assert_eq!(format_currency(dec!(10000000)), "R$ 10.000.000,00");
}

#[test]
fn test_format_currency_rounds_half_even() {
    assert_eq!(format_currency(dec!(64.935)), "R$ 64,94");
    assert_eq!(format_currency(dec!(0.125)), "R$ 0,12");
}

#[test]
fn test_format_currency_negative_rounding_to_zero() {
    assert_eq!(format_currency(dec!(-0.001)), "R$ 0,00");
}

// ── format_percent / format_date ──────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(dec!(12.3456)), "12,35%");
    assert_eq!(format_percent(dec!(25)), "25,00%");
    assert_eq!(format_percent(dec!(-8.5)), "-8,50%");
}

#[test]
fn test_format_date() {
    let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    assert_eq!(format_date(d), "07/03/2026");
    assert_eq!(format_optional_date(Some(d)), "07/03/2026");
    assert_eq!(format_optional_date(None), "—");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_and_bounds() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_index() {
    let mut index = 4;
    clamp_index(&mut index, 3);
    assert_eq!(index, 2);
    clamp_index(&mut index, 0);
    assert_eq!(index, 0);
}

// ── input parsing ─────────────────────────────────────────────

#[test]
fn test_parse_date_formats() {
    let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    assert_eq!(parse_date("2026-03-07"), Some(d));
    assert_eq!(parse_date(" 07/03/2026 "), Some(d));
    assert_eq!(parse_date("2026-02-30"), None);
    assert_eq!(parse_date("tomorrow"), None);
}

#[test]
fn test_split_trailing_numbers() {
    let (name, nums) = split_trailing_numbers("Kids table 4 12.5", 3);
    assert_eq!(name, "Kids table");
    assert_eq!(nums, vec![dec!(4), dec!(12.5)]);

    let (name, nums) = split_trailing_numbers("Buffet 80 30 55", 3);
    assert_eq!(name, "Buffet");
    assert_eq!(nums, vec![dec!(80), dec!(30), dec!(55)]);
}

#[test]
fn test_split_trailing_numbers_keeps_numeric_name() {
    // The first word always stays in the name
    let (name, nums) = split_trailing_numbers("2026 10", 3);
    assert_eq!(name, "2026");
    assert_eq!(nums, vec![dec!(10)]);

    let (name, nums) = split_trailing_numbers("Table for 4 10 20", 2);
    assert_eq!(name, "Table for 4");
    assert_eq!(nums, vec![dec!(10), dec!(20)]);
}
