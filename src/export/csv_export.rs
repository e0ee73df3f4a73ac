use anyhow::{Context, Result};
use std::path::Path;

use crate::db::Database;
use crate::models::{Quote, YearMonth};

const HEADERS: [&str; 15] = [
    "id",
    "client",
    "phone",
    "event",
    "event_date",
    "guests",
    "status",
    "pricing_mode",
    "desired_margin",
    "fixed_cost_share",
    "variable_cost",
    "total_sales",
    "net_profit",
    "margin_percent",
    "created_at",
];

/// Write quotes and their snapshots as CSV. Returns the number of rows written.
pub(crate) fn write_quotes_csv(quotes: &[Quote], path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(HEADERS)?;

    for quote in quotes {
        let snap = &quote.snapshot;
        wtr.write_record([
            quote.id.map(|id| id.to_string()).unwrap_or_default(),
            quote.client_name.clone(),
            quote.client_phone.clone(),
            quote.event_name.clone(),
            quote
                .event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            quote.guest_count.to_string(),
            quote.status.to_string(),
            quote.pricing_mode.kind().to_string(),
            quote
                .pricing_mode
                .desired_margin()
                .map(|m| m.to_string())
                .unwrap_or_default(),
            snap.fixed_cost_share.to_string(),
            snap.total_variable_cost.to_string(),
            snap.total_sales.to_string(),
            snap.net_profit.to_string(),
            snap.margin_percent.to_string(),
            quote.created_at.clone(),
        ])?;
    }

    wtr.flush().context("Failed to flush CSV file")?;
    Ok(quotes.len())
}

/// Export stored quotes, optionally only those with an event in `month`.
pub(crate) fn export_quotes(db: &Database, path: &Path, month: Option<YearMonth>) -> Result<usize> {
    let quotes = db.get_quotes(month)?;
    if quotes.is_empty() {
        return Ok(0);
    }
    let count = write_quotes_csv(&quotes, path)?;
    tracing::info!(count, path = %path.display(), "Exported quotes");
    Ok(count)
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
