use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::{format_currency, parse_date, split_trailing_numbers};
use crate::db::Database;
use crate::error::QuoteError;
use crate::models::{BusinessParameters, CatalogItem, CostScope, FixedCost, LineItem, Quote, QuoteStatus, YearMonth};
use crate::pricing::PricingMode;
use crate::{export, quoting};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("quotes", "Go to Quotes", cmd_quotes, r);
    register_command!("costs", "Go to Costs", cmd_costs, r);
    register_command!("catalog", "Go to Catalog", cmd_catalog, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2026-03)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2026-03)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "new",
        "New quote (e.g. :new Ana | Wedding | 2026-03-14 | margin:25 | 120)",
        cmd_new_quote,
        r
    );
    register_command!(
        "item",
        "Add item to selected quote (e.g. :item Buffet 80 30 55)",
        cmd_item,
        r
    );
    register_command!(
        "use",
        "Add catalog item to selected quote (e.g. :use Buffet 80)",
        cmd_use_catalog,
        r
    );
    register_command!("delete-item", "Remove selected item", cmd_delete_item, r);
    register_command!(
        "status",
        "Set quote status (draft, scheduled, completed, declined)",
        cmd_status,
        r
    );
    register_command!("delete-quote", "Delete selected quote", cmd_delete_quote, r);
    register_command!("reprice", "Recompute selected quote", cmd_reprice, r);
    register_command!("reprice-all", "Recompute all open quotes", cmd_reprice_all, r);
    register_command!(
        "cost",
        "Add fixed cost (e.g. :cost Rent 3500 or :cost Staff 800 2026-03)",
        cmd_cost,
        r
    );
    register_command!("delete-cost", "Delete selected fixed cost", cmd_delete_cost, r);
    register_command!(
        "params",
        "Set occupancy % and working days (e.g. :params 70 22)",
        cmd_params,
        r
    );
    register_command!(
        "add-catalog",
        "Add catalog item (e.g. :add-catalog Buffet 30 55)",
        cmd_add_catalog,
        r
    );
    register_command!(
        "delete-catalog",
        "Delete selected catalog item",
        cmd_delete_catalog,
        r
    );
    register_command!(
        "export",
        "Export month's quotes to CSV (e.g. :export ~/quotes.csv)",
        cmd_export,
        r
    );
    register_command!(
        "proposal",
        "Write proposal for selected quote (e.g. :proposal ~/Documents)",
        cmd_proposal,
        r
    );

    r
});

/// Run a `:` command. Domain errors become status messages; anything else
/// propagates.
pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            match e.downcast_ref::<QuoteError>() {
                Some(err) => app.set_status(err.to_string()),
                None => return Err(e),
            }
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn confirm(app: &mut App, message: String, action: PendingAction) {
    app.confirm_message = message;
    app.pending_action = Some(action);
    app.input_mode = InputMode::Confirm;
}

fn selected_quote_id(app: &mut App) -> Option<i64> {
    let id = app.selected_quote().and_then(|q| q.id);
    if id.is_none() {
        app.set_status("Select a quote on the Quotes screen first");
    }
    id
}

/// Replace the cached copy of a quote after a lifecycle call.
fn show_quote(app: &mut App, db: &Database, quote: &Quote) -> anyhow::Result<()> {
    app.screen = Screen::Quotes;
    app.refresh_quotes(db)?;
    if let Some(pos) = app.quotes.iter().position(|q| q.id == quote.id) {
        app.quote_index = pos;
    }
    app.refresh_dashboard(db)?;
    Ok(())
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_quotes(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Quotes;
    app.refresh_quotes(db)?;
    Ok(())
}

fn cmd_costs(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Costs;
    app.refresh_costs(db)?;
    Ok(())
}

fn cmd_catalog(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Catalog;
    app.refresh_catalog(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.current_month = YearMonth::current();
    } else {
        match YearMonth::parse(args) {
            Some(m) => app.current_month = m,
            None => {
                app.set_status("Invalid month format. Use YYYY-MM (e.g. 2026-03)");
                return Ok(());
            }
        }
    }
    app.set_status(format!("Month: {}", app.current_month));
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.current_month = app.current_month.next();
    app.set_status(format!("Month: {}", app.current_month));
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.current_month = app.current_month.prev();
    app.set_status(format!("Month: {}", app.current_month));
    app.refresh_dashboard(db)?;
    Ok(())
}

// ── Quotes ───────────────────────────────────────────────────

fn cmd_new_quote(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    if fields.len() < 3 {
        app.set_status("Usage: :new <client> | <event> | <date> [| fixed|margin:<pct>] [| <guests>]");
        return Ok(());
    }

    let Some(date) = parse_date(fields[2]) else {
        app.set_status(format!("Invalid date: {}. Use YYYY-MM-DD", fields[2]));
        return Ok(());
    };
    let mode = match fields.get(3).filter(|s| !s.is_empty()) {
        Some(s) => match PricingMode::parse(s) {
            Some(m) => m,
            None => {
                app.set_status(format!("Invalid pricing mode: {s}. Use fixed or margin:<pct>"));
                return Ok(());
            }
        },
        None => PricingMode::FixedPrice,
    };

    let mut quote = Quote::new(fields[0].to_string(), fields[1].to_string(), Some(date), mode);
    if let Some(guests) = fields.get(4).and_then(|s| s.parse().ok()) {
        quote.guest_count = guests;
    }

    quoting::save(db, &mut quote)?;
    show_quote(app, db, &quote)?;
    app.item_index = 0;
    app.set_status(format!("Created quote: {}", quote.label()));
    Ok(())
}

fn cmd_item(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (name, numbers) = split_trailing_numbers(args, 3);
    if name.is_empty() || numbers.len() < 2 {
        app.set_status("Usage: :item <name> <qty> <unit cost> [unit price]");
        return Ok(());
    }
    let Some(id) = selected_quote_id(app) else {
        return Ok(());
    };

    let quantity = numbers[0].trunc().to_i64().unwrap_or(0);
    let item = LineItem::new(name.clone(), quantity, numbers[1], numbers.get(2).copied());
    let quote = quoting::add_item(db, id, item)?;
    show_quote(app, db, &quote)?;
    app.item_index = quote.items.len().saturating_sub(1);
    app.set_status(format!(
        "Added {name}. Total: {}",
        format_currency(quote.snapshot.total_sales)
    ));
    Ok(())
}

fn cmd_use_catalog(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (name, numbers) = split_trailing_numbers(args, 1);
    if name.is_empty() {
        app.set_status("Usage: :use <catalog item> [qty]");
        return Ok(());
    }
    let Some(template) = CatalogItem::find_by_name(&app.catalog, &name).cloned() else {
        app.set_status(format!("Catalog item '{name}' not found"));
        return Ok(());
    };
    let Some(id) = selected_quote_id(app) else {
        return Ok(());
    };

    let quantity = numbers
        .first()
        .and_then(|q| q.trunc().to_i64())
        .unwrap_or(1);
    let quote = quoting::add_catalog_item(db, id, &template, quantity)?;
    show_quote(app, db, &quote)?;
    app.item_index = quote.items.len().saturating_sub(1);
    app.set_status(format!(
        "Added {} x{quantity}. Total: {}",
        template.name,
        format_currency(quote.snapshot.total_sales)
    ));
    Ok(())
}

fn cmd_delete_item(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(quote_id) = selected_quote_id(app) else {
        return Ok(());
    };
    let selected = app.selected_item().map(|i| (i.id.clone(), i.name.clone()));
    match selected {
        Some((item_id, name)) => {
            confirm(
                app,
                format!("Remove '{name}' from the quote?"),
                PendingAction::RemoveItem {
                    quote_id,
                    item_id,
                    name,
                },
            );
        }
        None => app.set_status("Quote has no items"),
    }
    Ok(())
}

fn cmd_status(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(status) = QuoteStatus::parse(args) else {
        let names: Vec<&str> = QuoteStatus::all().iter().map(|s| s.as_str()).collect();
        app.set_status(format!("Usage: :status <{}>", names.join("|")));
        return Ok(());
    };
    let Some(id) = selected_quote_id(app) else {
        return Ok(());
    };
    quoting::set_status(db, id, status)?;
    app.refresh_quotes(db)?;
    app.refresh_dashboard(db)?;
    app.set_status(format!("Status: {status}"));
    Ok(())
}

fn cmd_delete_quote(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = selected_quote_id(app) else {
        return Ok(());
    };
    let label = app.selected_quote().map(Quote::label).unwrap_or_default();
    confirm(
        app,
        format!("Delete quote '{label}'?"),
        PendingAction::DeleteQuote { id, label },
    );
    Ok(())
}

fn cmd_reprice(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = selected_quote_id(app) else {
        return Ok(());
    };
    let quote = quoting::reprice(db, id)?;
    show_quote(app, db, &quote)?;
    app.set_status(format!(
        "Repriced {}: {}",
        quote.label(),
        format_currency(quote.snapshot.total_sales)
    ));
    Ok(())
}

fn cmd_reprice_all(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    confirm(
        app,
        "Recompute every draft and scheduled quote?".into(),
        PendingAction::RepriceAll,
    );
    Ok(())
}

// ── Costs ────────────────────────────────────────────────────

fn cmd_cost(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (rest, scope) = match args.rsplit_once(' ') {
        Some((head, last)) => match YearMonth::parse(last) {
            Some(m) => (head, CostScope::Period(m)),
            None => (args, CostScope::Recurring),
        },
        None => (args, CostScope::Recurring),
    };
    let (name, numbers) = split_trailing_numbers(rest, 1);
    let Some(amount) = numbers.first().copied() else {
        app.set_status("Usage: :cost <name> <amount> [YYYY-MM]");
        return Ok(());
    };

    quoting::add_fixed_cost(db, &FixedCost::new(name.clone(), amount, scope))?;
    app.screen = Screen::Costs;
    app.refresh_costs(db)?;
    app.refresh_quotes(db)?;
    app.set_status(format!(
        "Added {name} ({scope}): {}. {} quote(s) now stale",
        format_currency(amount),
        app.stale_ids.len()
    ));
    Ok(())
}

fn cmd_delete_cost(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let selected = app
        .selected_cost()
        .and_then(|c| c.id.map(|id| (id, c.name.clone())));
    match selected {
        Some((id, name)) => confirm(
            app,
            format!("Delete fixed cost '{name}'?"),
            PendingAction::DeleteCost { id, name },
        ),
        None => app.set_status("No fixed cost selected"),
    }
    Ok(())
}

fn cmd_params(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let numbers: Vec<Decimal> = args
        .split_whitespace()
        .filter_map(|s| Decimal::from_str(s.trim_end_matches('%')).ok())
        .collect();
    if numbers.len() != 2 {
        let p = &app.params;
        app.set_status(format!(
            "Occupancy {}%, {} working days. Usage: :params <occupancy %> <days>",
            p.occupancy_rate, p.working_days_per_month
        ));
        return Ok(());
    }
    let whole_days = Some(numbers[1])
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_i32());
    let Some(days) = whole_days else {
        app.set_status(format!("Invalid working days: {}", numbers[1]));
        return Ok(());
    };
    if numbers[0] < Decimal::ZERO || numbers[0] > Decimal::ONE_HUNDRED || days < 0 {
        app.set_status("Occupancy must be 0-100 and days must not be negative");
        return Ok(());
    }

    let params = BusinessParameters::new(numbers[0], days);
    db.save_parameters(&params)?;
    tracing::info!(occupancy_rate = %params.occupancy_rate, days, "Saved business parameters");
    app.refresh_costs(db)?;
    app.refresh_quotes(db)?;
    let msg = if params.has_capacity() {
        format!(
            "Saved: {} expected events/month. {} quote(s) now stale",
            params.expected_events_per_month().normalize(),
            app.stale_ids.len()
        )
    } else {
        "Saved, but no expected events: fixed costs will not be allocated".to_string()
    };
    app.set_status(msg);
    Ok(())
}

// ── Catalog ──────────────────────────────────────────────────

fn cmd_add_catalog(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (name, numbers) = split_trailing_numbers(args, 2);
    if name.is_empty() || numbers.len() < 2 {
        app.set_status("Usage: :add-catalog <name> <unit cost> <unit price>");
        return Ok(());
    }
    quoting::add_catalog_template(db, &CatalogItem::new(name.clone(), numbers[0], numbers[1]))?;
    app.screen = Screen::Catalog;
    app.refresh_catalog(db)?;
    app.set_status(format!("Added catalog item: {name}"));
    Ok(())
}

fn cmd_delete_catalog(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let selected = app
        .selected_catalog_item()
        .and_then(|c| c.id.map(|id| (id, c.name.clone())));
    match selected {
        Some((id, name)) => confirm(
            app,
            format!("Delete catalog item '{name}'?"),
            PendingAction::DeleteCatalogItem { id, name },
        ),
        None => app.set_status("No catalog item selected"),
    }
    Ok(())
}

// ── Export ───────────────────────────────────────────────────

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/eventquote-export-{}.csv", app.current_month)
    } else {
        crate::run::shellexpand(args)
    };

    let count = export::export_quotes(db, Path::new(&path), Some(app.current_month))?;
    if count == 0 {
        app.set_status(format!("No quotes for {}", app.current_month));
    } else {
        app.set_status(format!("Exported {count} quotes to {path}"));
    }
    Ok(())
}

fn cmd_proposal(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(quote) = app.selected_quote().cloned() else {
        app.set_status("Select a quote on the Quotes screen first");
        return Ok(());
    };
    let dir = if args.is_empty() {
        std::env::var("HOME").unwrap_or_else(|_| ".".into())
    } else {
        crate::run::shellexpand(args)
    };

    let today = chrono::Local::now().date_naive();
    let path = export::write_proposal(&quote, Path::new(&dir), today)?;
    app.set_status(format!("Proposal written to {}", path.display()));
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
