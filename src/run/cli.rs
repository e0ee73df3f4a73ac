use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{BusinessParameters, CatalogItem, FixedCost, LineItem, Quote, QuoteStatus, YearMonth};
use crate::pricing::{self, PricingMode};
use crate::ui::util::{format_currency, format_optional_date, format_percent, parse_date, truncate};
use crate::{export, quoting};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "quote" | "q" => cli_quote(&args[2..], db),
        "costs" => cli_costs(&args[2..], db),
        "params" => cli_params(&args[2..], db),
        "catalog" => cli_catalog(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "proposal" => cli_proposal(&args[2..], db),
        "summary" | "s" => cli_summary(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("eventquote {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("eventquote - event pricing and quoting");
    println!();
    println!("Usage: eventquote [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                  Launch interactive TUI");
    println!("  quote new --client <name> --event <name> --date <YYYY-MM-DD>");
    println!("        [--phone <p>] [--guests <n>] [--mode fixed|margin:<pct>]");
    println!("  quote list [--month <YYYY-MM>]          List quotes");
    println!("  quote show <id>                         Show items and financials");
    println!("  quote add-item <id> <name> <qty> <unit cost> [unit price]");
    println!("  quote add-item <id> --catalog <name|id> [qty]");
    println!("  quote remove-item <id> <item>           Item id, position or name");
    println!("  quote status <id> <draft|scheduled|completed|declined>");
    println!("  quote reprice <id> | --all              Recompute stored financials");
    println!("  quote check                             List quotes priced on old costs");
    println!("  quote delete <id>                       Delete a quote and its items");
    println!("  costs [list]                            List fixed costs");
    println!("  costs add <name> <amount> [--month <YYYY-MM>]");
    println!("  costs delete <id>");
    println!("  params [show]                           Show allocation parameters");
    println!("  params set <occupancy %> <days>         Update allocation parameters");
    println!("  catalog [list]                          List item templates");
    println!("  catalog add <name> <unit cost> <unit price>");
    println!("  catalog delete <id>");
    println!("  export [path] [--month <YYYY-MM>]       Export quotes to CSV");
    println!("  proposal <id> [dir] [--print]           Write a client proposal");
    println!("  summary [YYYY-MM]                       Print monthly summary");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Positional arguments with `--flag value` pairs removed.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if arg != "--all" && arg != "--print" {
                iter.next();
            }
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_id(s: Option<&&str>, what: &str) -> Result<i64> {
    let s = s.ok_or_else(|| anyhow::anyhow!("Missing {what} id"))?;
    s.parse()
        .with_context(|| format!("Invalid {what} id: {s}"))
}

fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim().trim_end_matches('%')).with_context(|| format!("Invalid number: {s}"))
}

fn parse_month(s: &str) -> Result<YearMonth> {
    s.parse()
}

// ── Quotes ───────────────────────────────────────────────────

fn cli_quote(args: &[String], db: &mut Database) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    match sub {
        "new" => quote_new(rest, db),
        "list" | "ls" => quote_list(rest, db),
        "show" => quote_show(rest, db),
        "add-item" => quote_add_item(rest, db),
        "remove-item" => quote_remove_item(rest, db),
        "status" => quote_status(rest, db),
        "reprice" => quote_reprice(rest, db),
        "check" => quote_check(db),
        "delete" | "rm" => {
            let id = parse_id(positional(rest).first(), "quote")?;
            quoting::delete(db, id)?;
            println!("Deleted quote #{id}");
            Ok(())
        }
        other => anyhow::bail!("Unknown quote command: {other}. See eventquote help"),
    }
}

fn quote_new(args: &[String], db: &mut Database) -> Result<()> {
    let client = flag(args, "--client").unwrap_or_default();
    let event = flag(args, "--event").unwrap_or_default();
    let date = match flag(args, "--date") {
        Some(s) => Some(parse_date(s).ok_or_else(|| anyhow::anyhow!("Invalid date: {s}. Use YYYY-MM-DD"))?),
        None => None,
    };
    let mode = match flag(args, "--mode") {
        Some(s) => PricingMode::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid pricing mode: {s}. Use fixed or margin:<pct>"))?,
        None => PricingMode::FixedPrice,
    };

    let mut quote = Quote::new(client.to_string(), event.to_string(), date, mode);
    if let Some(phone) = flag(args, "--phone") {
        quote.client_phone = phone.to_string();
    }
    if let Some(guests) = flag(args, "--guests") {
        quote.guest_count = guests
            .parse()
            .with_context(|| format!("Invalid guest count: {guests}"))?;
    }

    let id = quoting::save(db, &mut quote)?;
    println!("Created quote #{id}: {}", quote.label());
    Ok(())
}

fn quote_list(args: &[String], db: &mut Database) -> Result<()> {
    let month = flag(args, "--month").map(parse_month).transpose()?;
    let quotes = db.get_quotes(month)?;
    if quotes.is_empty() {
        println!("No quotes");
        return Ok(());
    }

    println!(
        "{:<5} {:<11} {:<24} {:<20} {:<10} {:>16}",
        "ID", "Date", "Event", "Client", "Status", "Total"
    );
    println!("{}", "─".repeat(91));
    for q in &quotes {
        println!(
            "{:<5} {:<11} {:<24} {:<20} {:<10} {:>16}",
            q.id.unwrap_or(0),
            format_optional_date(q.event_date),
            truncate(&q.event_name, 24),
            truncate(&q.client_name, 20),
            q.status.as_str(),
            format_currency(q.snapshot.total_sales),
        );
    }
    Ok(())
}

fn quote_show(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(positional(args).first(), "quote")?;
    let quote = quoting::load(db, id)?;
    print_quote(&quote);
    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("Quote #{}: {}", quote.id.unwrap_or(0), quote.label());
    println!("{}", "─".repeat(60));
    println!("  Date:     {}", format_optional_date(quote.event_date));
    println!("  Guests:   {}", quote.guest_count);
    if !quote.client_phone.is_empty() {
        println!("  Phone:    {}", quote.client_phone);
    }
    println!("  Status:   {}", quote.status);
    println!("  Pricing:  {}", quote.pricing_mode);

    if !quote.items.is_empty() {
        println!();
        println!(
            "  {:<3} {:<24} {:>5} {:>13} {:>13}",
            "#", "Item", "Qty", "Unit cost", "Unit price"
        );
        for (i, item) in quote.items.iter().enumerate() {
            println!(
                "  {:<3} {:<24} {:>5} {:>13} {:>13}",
                i + 1,
                truncate(&item.name, 24),
                item.quantity,
                format_currency(item.unit_cost),
                item.unit_price.map(format_currency).unwrap_or_else(|| "—".into()),
            );
        }
    }

    let snap = &quote.snapshot;
    println!();
    println!("  Fixed cost share:  {:>16}", format_currency(snap.fixed_cost_share));
    println!("  Variable cost:     {:>16}", format_currency(snap.total_variable_cost));
    println!("  Total cost:        {:>16}", format_currency(snap.total_cost()));
    println!("  Total sales:       {:>16}", format_currency(snap.total_sales));
    println!("  Net profit:        {:>16}", format_currency(snap.net_profit));
    println!("  Margin:            {:>16}", format_percent(snap.margin_percent));
}

fn quote_add_item(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let id = parse_id(pos.first(), "quote")?;

    let quote = if let Some(key) = flag(args, "--catalog") {
        let template = match key.parse::<i64>() {
            Ok(catalog_id) => db.get_catalog_item_by_id(catalog_id)?,
            Err(_) => {
                let catalog = db.get_catalog_items()?;
                CatalogItem::find_by_name(&catalog, key).cloned()
            }
        }
        .ok_or_else(|| anyhow::anyhow!("Catalog item '{key}' not found"))?;
        let quantity = match pos.get(1) {
            Some(q) => q.parse().with_context(|| format!("Invalid quantity: {q}"))?,
            None => 1,
        };
        quoting::add_catalog_item(db, id, &template, quantity)?
    } else {
        if pos.len() < 4 {
            anyhow::bail!("Usage: eventquote quote add-item <id> <name> <qty> <unit cost> [unit price]");
        }
        let quantity: i64 = pos[2]
            .parse()
            .with_context(|| format!("Invalid quantity: {}", pos[2]))?;
        let unit_cost = parse_amount(pos[3])?;
        let unit_price = pos.get(4).map(|p| parse_amount(p)).transpose()?;
        let item = LineItem::new(pos[1].to_string(), quantity, unit_cost, unit_price);
        quoting::add_item(db, id, item)?
    };

    println!(
        "Quote #{id} now has {} item(s). Total: {}",
        quote.items.len(),
        format_currency(quote.snapshot.total_sales)
    );
    Ok(())
}

fn quote_remove_item(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let id = parse_id(pos.first(), "quote")?;
    let key = pos
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: eventquote quote remove-item <id> <item>"))?;

    // Accept the item id, a 1-based position, or the item name
    let quote = quoting::load(db, id)?;
    let item_id = quote
        .find_item(key)
        .or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| quote.items.get(i))
        })
        .or_else(|| {
            let lower = key.to_lowercase();
            quote.items.iter().find(|i| i.name.to_lowercase() == lower)
        })
        .map(|i| i.id.clone())
        .unwrap_or_else(|| key.to_string());

    let quote = quoting::remove_item(db, id, &item_id)?;
    println!(
        "Removed. Quote #{id} total: {}",
        format_currency(quote.snapshot.total_sales)
    );
    Ok(())
}

fn quote_status(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let id = parse_id(pos.first(), "quote")?;
    let status = pos
        .get(1)
        .and_then(|s| QuoteStatus::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Status must be draft, scheduled, completed or declined"))?;
    quoting::set_status(db, id, status)?;
    println!("Quote #{id} is now {status}");
    Ok(())
}

fn quote_reprice(args: &[String], db: &mut Database) -> Result<()> {
    if args.iter().any(|a| a == "--all") {
        let changed = quoting::reprice_all(db)?;
        println!("Repriced open quotes: {changed} changed");
        return Ok(());
    }
    let id = parse_id(positional(args).first(), "quote")?;
    let before = quoting::load(db, id)?.snapshot;
    let quote = quoting::reprice(db, id)?;
    println!(
        "Quote #{id}: {} -> {}",
        format_currency(before.total_sales),
        format_currency(quote.snapshot.total_sales)
    );
    Ok(())
}

fn quote_check(db: &mut Database) -> Result<()> {
    let stale = quoting::stale_quotes(db)?;
    if stale.is_empty() {
        println!("All quotes match current costs");
        return Ok(());
    }
    println!("{} quote(s) priced on outdated costs:", stale.len());
    for s in &stale {
        println!(
            "  #{:<4} {:<32} stored {} now {}",
            s.quote.id.unwrap_or(0),
            truncate(&s.quote.label(), 32),
            format_currency(s.quote.snapshot.total_sales),
            format_currency(s.fresh.total_sales),
        );
    }
    println!("Run `eventquote quote reprice <id>` or `--all` to update");
    Ok(())
}

// ── Costs and parameters ─────────────────────────────────────

fn cli_costs(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str).unwrap_or("list") {
        "list" | "ls" => {
            let costs = db.get_fixed_costs()?;
            if costs.is_empty() {
                println!("No fixed costs");
                return Ok(());
            }
            for (scope, members) in FixedCost::group_by_scope(&costs) {
                println!("{scope}  {}", format_currency(FixedCost::total(&members)));
                for c in members {
                    println!(
                        "  {:<5} {:<30} {:>16}",
                        c.id.unwrap_or(0),
                        truncate(&c.name, 30),
                        format_currency(c.amount)
                    );
                }
            }
            Ok(())
        }
        "add" => {
            let rest = &args[1..];
            let pos = positional(rest);
            if pos.len() < 2 {
                anyhow::bail!("Usage: eventquote costs add <name> <amount> [--month <YYYY-MM>]");
            }
            let name = pos[0].to_string();
            let amount = parse_amount(pos[1])?;
            let cost = match flag(rest, "--month") {
                Some(m) => FixedCost::for_month(name, amount, parse_month(m)?),
                None => FixedCost::recurring(name, amount),
            };
            let id = quoting::add_fixed_cost(db, &cost)?;
            println!("Added fixed cost #{id}: {} ({})", format_currency(amount), cost.scope);
            Ok(())
        }
        "delete" | "rm" => {
            let id = parse_id(args.get(1).map(String::as_str).as_ref(), "cost")?;
            if !db.delete_fixed_cost(id)? {
                anyhow::bail!("Fixed cost #{id} not found");
            }
            println!("Deleted fixed cost #{id}");
            Ok(())
        }
        other => anyhow::bail!("Unknown costs command: {other}"),
    }
}

fn cli_params(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str).unwrap_or("show") {
        "show" => {
            let params = db.get_parameters()?;
            let costs = db.get_fixed_costs()?;
            let month = YearMonth::current();
            let b = pricing::breakdown(&costs, &params, Some(month.first_day()));
            println!("Occupancy rate:   {}", format_percent(params.occupancy_rate));
            println!("Working days:     {}", params.working_days_per_month);
            println!("Expected events:  {}", b.expected_events.normalize());
            println!(
                "Share for {month}: {} / {} = {}",
                format_currency(b.total_fixed),
                b.expected_events.normalize(),
                format_currency(b.share)
            );
            if b.is_degenerate() {
                eprintln!("Warning: no expected events, fixed costs are not allocated");
            }
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                anyhow::bail!("Usage: eventquote params set <occupancy %> <days>");
            }
            let occupancy = parse_amount(&args[1])?;
            let days: i32 = args[2]
                .parse()
                .with_context(|| format!("Invalid working days: {}", args[2]))?;
            if occupancy < Decimal::ZERO || occupancy > Decimal::ONE_HUNDRED || days < 0 {
                anyhow::bail!("Occupancy must be 0-100 and days must not be negative");
            }
            let params = BusinessParameters::new(occupancy, days);
            db.save_parameters(&params)?;
            tracing::info!(occupancy_rate = %occupancy, days, "Saved business parameters");
            println!(
                "Saved: {} expected events per month",
                params.expected_events_per_month().normalize()
            );
            Ok(())
        }
        other => anyhow::bail!("Unknown params command: {other}"),
    }
}

// ── Catalog ──────────────────────────────────────────────────

fn cli_catalog(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str).unwrap_or("list") {
        "list" | "ls" => {
            let items = db.get_catalog_items()?;
            if items.is_empty() {
                println!("Catalog is empty");
                return Ok(());
            }
            println!("{:<5} {:<30} {:>14} {:>14}", "ID", "Name", "Unit cost", "Unit price");
            println!("{}", "─".repeat(66));
            for item in &items {
                println!(
                    "{:<5} {:<30} {:>14} {:>14}",
                    item.id.unwrap_or(0),
                    truncate(&item.name, 30),
                    format_currency(item.default_unit_cost),
                    format_currency(item.default_unit_price),
                );
            }
            Ok(())
        }
        "add" => {
            if args.len() < 4 {
                anyhow::bail!("Usage: eventquote catalog add <name> <unit cost> <unit price>");
            }
            let item = CatalogItem::new(args[1].clone(), parse_amount(&args[2])?, parse_amount(&args[3])?);
            let id = quoting::add_catalog_template(db, &item)?;
            println!("Added catalog item #{id}: {}", item.name);
            Ok(())
        }
        "delete" | "rm" => {
            let id = parse_id(args.get(1).map(String::as_str).as_ref(), "catalog item")?;
            if !db.delete_catalog_item(id)? {
                anyhow::bail!("Catalog item #{id} not found");
            }
            println!("Deleted catalog item #{id}");
            Ok(())
        }
        other => anyhow::bail!("Unknown catalog command: {other}"),
    }
}

// ── Output ───────────────────────────────────────────────────

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let month = match flag(args, "--month") {
        Some(m) => parse_month(m)?,
        None => YearMonth::current(),
    };

    // Output path is the first non-flag argument
    let output_path = positional(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/eventquote-export-{month}.csv")
        });

    let count = export::export_quotes(db, Path::new(&output_path), Some(month))?;
    if count == 0 {
        println!("No quotes for {month}");
    } else {
        println!("Exported {count} quotes to {output_path}");
    }
    Ok(())
}

fn cli_proposal(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let id = parse_id(pos.first(), "quote")?;
    let quote = quoting::load(db, id)?;
    let today = chrono::Local::now().date_naive();

    if args.iter().any(|a| a == "--print") {
        print!("{}", export::render_proposal(&quote, today)?);
        return Ok(());
    }

    let dir = pos
        .get(1)
        .map(|d| shellexpand(d))
        .unwrap_or_else(|| ".".into());
    let path = export::write_proposal(&quote, Path::new(&dir), today)?;
    println!("Proposal written to {}", path.display());
    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let month = match positional(args).first() {
        Some(m) => parse_month(m)?,
        None => YearMonth::current(),
    };

    let stats = db.get_quote_stats(month)?;
    let params = db.get_parameters()?;
    let costs = db.get_fixed_costs()?;
    let overhead = pricing::breakdown(&costs, &params, Some(month.first_day()));

    println!("eventquote - {month}");
    println!("{}", "─".repeat(40));
    println!("  Revenue:      {}", format_currency(stats.revenue));
    println!("  Pending:      {}", stats.pending);
    println!("  Scheduled:    {}", stats.scheduled);
    println!("  Completed:    {}", stats.completed);
    println!("  Declined:     {}", stats.declined);
    println!("  Fixed costs:  {}", format_currency(overhead.total_fixed));
    println!("  Per event:    {}", format_currency(overhead.share));

    let today = chrono::Local::now().date_naive();
    let upcoming = db.get_upcoming_events(today, 5)?;
    if !upcoming.is_empty() {
        println!();
        println!("Upcoming events:");
        for q in &upcoming {
            println!(
                "  {}  {:<28} {:>16}",
                format_optional_date(q.event_date),
                truncate(&q.label(), 28),
                format_currency(q.snapshot.total_sales)
            );
        }
    }

    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
