use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::error::QuoteError;
use crate::models::Quote;
use crate::ui::util::{format_currency, format_date, format_optional_date, truncate};

/// Days a proposal stays valid after it is generated.
pub(crate) const VALIDITY_DAYS: u32 = 15;

const WIDTH: usize = 56;
const QTY_WIDTH: usize = 6;

/// Client-facing proposal. Refuses quotes whose snapshot does not add up.
pub(crate) fn render_proposal(quote: &Quote, generated_on: NaiveDate) -> Result<String> {
    if !quote.snapshot.is_consistent() {
        return Err(QuoteError::InconsistentSnapshot(quote.label()).into());
    }

    let rule = "─".repeat(WIDTH);
    let desc_width = WIDTH - QTY_WIDTH - 1;
    let mut out = String::new();

    out.push_str("EVENT PROPOSAL\n");
    out.push_str(&format!("Generated on: {}\n\n", format_date(generated_on)));

    let rows = [
        ("Client:", quote.client_name.clone()),
        ("Event:", quote.event_name.clone()),
        ("Phone:", quote.client_phone.clone()),
        ("Event date:", format_optional_date(quote.event_date)),
        ("Guests:", format!("{} guests", quote.guest_count)),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{label:<14}{value}\n"));
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<desc_width$} {:>QTY_WIDTH$}\n",
        "ITEM DESCRIPTION", "QTY"
    ));
    out.push_str(&format!("{rule}\n"));
    for item in &quote.items {
        out.push_str(&format!(
            "{:<desc_width$} {:>QTY_WIDTH$}\n",
            truncate(&item.name, desc_width),
            item.quantity
        ));
    }
    out.push_str(&format!("{rule}\n"));

    let total = format_currency(quote.snapshot.total_sales);
    let label_width = WIDTH.saturating_sub(total.chars().count() + 1);
    out.push_str(&format!("{:<label_width$} {total}\n\n", "GRAND TOTAL"));

    out.push_str(&format!("Proposal valid for {VALIDITY_DAYS} days.\n"));
    out.push_str("Thank you for choosing us!\n");
    Ok(out)
}

/// `Proposal_<client>_<event date>.txt`. Anything in the client name other than
/// letters, digits, `-` and `_` becomes `_`, so the name never leaves `dir`.
pub(crate) fn proposal_file_name(quote: &Quote, generated_on: NaiveDate) -> String {
    let client: String = quote
        .client_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let date = quote.event_date.unwrap_or(generated_on);
    format!("Proposal_{client}_{}.txt", date.format("%Y-%m-%d"))
}

/// Render and write the proposal into `dir`, returning the file path.
pub(crate) fn write_proposal(quote: &Quote, dir: &Path, generated_on: NaiveDate) -> Result<PathBuf> {
    let text = render_proposal(quote, generated_on)?;
    let path = dir.join(proposal_file_name(quote, generated_on));
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write proposal: {}", path.display()))?;
    tracing::info!(path = %path.display(), quote = %quote.label(), "Wrote proposal");
    Ok(path)
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
