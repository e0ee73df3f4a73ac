//! Quote lifecycle on top of the pricing engine and the store.
//!
//! Every write goes validate, recompute, check, persist. The snapshot stored
//! with a quote is always the rounded engine result for its items under the
//! catalog and parameters loaded for that save.

mod validate;

use anyhow::Result;

use crate::db::Database;
use crate::error::QuoteError;
use crate::models::{BusinessParameters, CatalogItem, FixedCost, LineItem, Quote, QuoteStatus};
use crate::pricing::{self, FinancialResult};

pub(crate) use validate::{validate_catalog_item, validate_fixed_cost, validate_quote};

/// Cost catalog and parameters read once and shared by a batch of recomputes.
pub(crate) struct PricingInputs {
    pub(crate) costs: Vec<FixedCost>,
    pub(crate) params: BusinessParameters,
}

impl PricingInputs {
    pub(crate) fn load(db: &Database) -> Result<Self> {
        let params = db.get_parameters()?;
        if !params.has_capacity() {
            tracing::warn!(
                occupancy_rate = %params.occupancy_rate,
                working_days = params.working_days_per_month,
                "No expected events per month; fixed costs will not be allocated"
            );
        }
        Ok(Self {
            costs: db.get_fixed_costs()?,
            params,
        })
    }

    /// Rounded engine result for the quote as it stands.
    pub(crate) fn price(&self, quote: &Quote) -> FinancialResult {
        tracing::debug!(quote = %quote.label(), items = quote.items.len(), "Recomputing");
        pricing::price(
            &quote.pricing_mode,
            &quote.items,
            &self.costs,
            &self.params,
            quote.event_date,
        )
        .rounded()
    }
}

/// A stored snapshot that no longer matches a fresh recompute.
#[derive(Debug, Clone)]
pub(crate) struct StaleQuote {
    pub(crate) quote: Quote,
    pub(crate) fresh: FinancialResult,
}

/// Validate, recompute and persist. Sets `quote.id` on first insert.
pub(crate) fn save(db: &mut Database, quote: &mut Quote) -> Result<i64> {
    validate_quote(quote)?;
    let inputs = PricingInputs::load(db)?;
    save_with(db, &inputs, quote)
}

fn save_with(db: &mut Database, inputs: &PricingInputs, quote: &mut Quote) -> Result<i64> {
    let snapshot = inputs.price(quote);
    if !snapshot.is_consistent() {
        return Err(QuoteError::InconsistentSnapshot(quote.label()).into());
    }
    quote.snapshot = snapshot;
    if quote.created_at.is_empty() {
        quote.created_at = chrono::Utc::now().to_rfc3339();
    }

    let id = db.save_quote(quote)?;
    quote.id = Some(id);
    tracing::info!(
        id,
        quote = %quote.label(),
        total_sales = %quote.snapshot.total_sales,
        net_profit = %quote.snapshot.net_profit,
        "Saved quote"
    );
    Ok(id)
}

pub(crate) fn load(db: &Database, id: i64) -> Result<Quote> {
    Ok(db.get_quote_by_id(id)?.ok_or(QuoteError::NotFound(id))?)
}

pub(crate) fn add_item(db: &mut Database, id: i64, item: LineItem) -> Result<Quote> {
    let mut quote = load(db, id)?;
    quote.items.push(item);
    save(db, &mut quote)?;
    Ok(quote)
}

/// Build an item from a catalog template and add it with the given quantity.
pub(crate) fn add_catalog_item(
    db: &mut Database,
    id: i64,
    template: &CatalogItem,
    quantity: i64,
) -> Result<Quote> {
    let mut item = LineItem::from_catalog(template);
    item.quantity = quantity;
    add_item(db, id, item)
}

pub(crate) fn remove_item(db: &mut Database, id: i64, item_id: &str) -> Result<Quote> {
    let mut quote = load(db, id)?;
    if quote.remove_item(item_id).is_none() {
        return Err(QuoteError::ItemNotFound {
            quote_id: id,
            item_id: item_id.to_string(),
        }
        .into());
    }
    save(db, &mut quote)?;
    Ok(quote)
}

pub(crate) fn reprice(db: &mut Database, id: i64) -> Result<Quote> {
    let mut quote = load(db, id)?;
    save(db, &mut quote)?;
    Ok(quote)
}

/// Recompute every open quote against the current catalog.
/// Returns the number of snapshots that changed.
pub(crate) fn reprice_all(db: &mut Database) -> Result<usize> {
    let inputs = PricingInputs::load(db)?;
    let mut changed = 0;
    for mut quote in db.get_quotes(None)? {
        if !quote.status.is_open() {
            continue;
        }
        if let Err(e) = validate_quote(&quote) {
            tracing::warn!(quote = %quote.label(), error = %e, "Skipping reprice");
            continue;
        }
        let before = quote.snapshot;
        save_with(db, &inputs, &mut quote)?;
        if quote.snapshot != before {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Quotes whose stored snapshot differs from a fresh recompute.
pub(crate) fn stale_quotes(db: &Database) -> Result<Vec<StaleQuote>> {
    let inputs = PricingInputs::load(db)?;
    let mut stale = Vec::new();
    for quote in db.get_quotes(None)? {
        let fresh = inputs.price(&quote);
        if fresh != quote.snapshot {
            tracing::warn!(
                quote = %quote.label(),
                stored = %quote.snapshot.total_sales,
                fresh = %fresh.total_sales,
                "Stale snapshot"
            );
            stale.push(StaleQuote { quote, fresh });
        }
    }
    Ok(stale)
}

pub(crate) fn set_status(db: &Database, id: i64, status: QuoteStatus) -> Result<()> {
    if !db.update_quote_status(id, status)? {
        return Err(QuoteError::NotFound(id).into());
    }
    tracing::info!(id, %status, "Updated quote status");
    Ok(())
}

pub(crate) fn delete(db: &Database, id: i64) -> Result<()> {
    if !db.delete_quote(id)? {
        return Err(QuoteError::NotFound(id).into());
    }
    tracing::info!(id, "Deleted quote");
    Ok(())
}

pub(crate) fn add_fixed_cost(db: &Database, cost: &FixedCost) -> Result<i64> {
    validate_fixed_cost(cost)?;
    let id = db.insert_fixed_cost(cost)?;
    tracing::info!(id, name = %cost.name, amount = %cost.amount, scope = %cost.scope, "Added fixed cost");
    Ok(id)
}

pub(crate) fn add_catalog_template(db: &Database, item: &CatalogItem) -> Result<i64> {
    validate_catalog_item(item)?;
    let id = db.insert_catalog_item(item)?;
    tracing::info!(id, name = %item.name, "Added catalog item");
    Ok(id)
}
