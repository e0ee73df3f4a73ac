use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::pricing::round_money;

/// Group the integer digits with `.` and use `,` for cents.
/// e.g. `1234567.891` → `"1.234.567,89"`
fn format_grouped(val: Decimal) -> String {
    let rounded = round_money(val.abs(), 2);
    let formatted = format!("{rounded:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let grouped: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");

    format!("{grouped},{dec_part}")
}

/// Currency display for screens and proposals.
/// e.g. `1234.5` → `"R$ 1.234,50"`, `-10` → `"-R$ 10,00"`
pub(crate) fn format_currency(val: Decimal) -> String {
    let body = format_grouped(val);
    if round_money(val, 2) < Decimal::ZERO {
        format!("-R$ {body}")
    } else {
        format!("R$ {body}")
    }
}

/// e.g. `12.3456` → `"12,35%"`
pub(crate) fn format_percent(val: Decimal) -> String {
    let sign = if round_money(val, 2) < Decimal::ZERO {
        "-"
    } else {
        ""
    };
    format!("{sign}{}%", format_grouped(val))
}

/// `DD/MM/YYYY`
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub(crate) fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "—".into())
}

/// Accepts `YYYY-MM-DD` or `DD/MM/YYYY`.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

/// Split up to `max` trailing numeric tokens off `input`.
/// e.g. `("Kids table 4 12.5", 3)` → `("Kids table", [4, 12.5])`
pub(crate) fn split_trailing_numbers(input: &str, max: usize) -> (String, Vec<Decimal>) {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    let mut numbers = Vec::new();
    while numbers.len() < max && words.len() > 1 {
        match words.last().and_then(|w| Decimal::from_str(w).ok()) {
            Some(n) => {
                numbers.push(n);
                words.pop();
            }
            None => break,
        }
    }
    numbers.reverse();
    (words.join(" "), numbers)
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Keep a cursor inside a list that may have shrunk.
pub(crate) fn clamp_index(index: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
}
