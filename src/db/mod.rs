mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::QuoteError;
use crate::models::*;
use crate::pricing::{FinancialResult, PricingMode};

const QUOTE_COLUMNS: &str = "id, client_name, client_phone, event_name, event_date, guest_count, status,
     pricing_mode, desired_margin, fixed_cost_share, variable_cost, total_sales, net_profit,
     margin_percent, created_at";

/// Status counts plus completed revenue for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QuoteStats {
    pub(crate) pending: i64,
    pub(crate) scheduled: i64,
    pub(crate) completed: i64,
    pub(crate) declined: i64,
    pub(crate) revenue: Decimal,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(version = schema::CURRENT_VERSION, "Created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "Applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Business parameters ───────────────────────────────────

    /// Saved parameters, or the defaults when none were ever saved.
    pub(crate) fn get_parameters(&self) -> Result<BusinessParameters> {
        let result = self.conn.query_row(
            "SELECT occupancy_rate, working_days_per_month FROM settings WHERE id = 1",
            [],
            |row| {
                let rate: String = row.get(0)?;
                Ok(BusinessParameters {
                    occupancy_rate: Decimal::from_str(&rate).unwrap_or_default(),
                    working_days_per_month: row.get(1)?,
                })
            },
        );
        match result {
            Ok(p) => Ok(p),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(BusinessParameters::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn save_parameters(&self, params: &BusinessParameters) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (id, occupancy_rate, working_days_per_month)
             VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET occupancy_rate = ?1, working_days_per_month = ?2",
            params![
                params.occupancy_rate.to_string(),
                params.working_days_per_month
            ],
        )?;
        Ok(())
    }

    // ── Fixed costs ───────────────────────────────────────────

    pub(crate) fn insert_fixed_cost(&self, cost: &FixedCost) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO fixed_costs (name, amount, month) VALUES (?1, ?2, ?3)",
            params![
                cost.name,
                cost.amount.to_string(),
                cost.scope.month().map(|m| m.to_string()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_fixed_costs(&self) -> Result<Vec<FixedCost>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, amount, month FROM fixed_costs ORDER BY month DESC, name")?;
        let rows = stmt.query_map([], |row| {
            let amount: String = row.get(2)?;
            let month: Option<String> = row.get(3)?;
            Ok(FixedCost {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                amount: Decimal::from_str(&amount).unwrap_or_default(),
                scope: month
                    .as_deref()
                    .and_then(CostScope::parse)
                    .unwrap_or(CostScope::Recurring),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_fixed_cost(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM fixed_costs WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Catalog ───────────────────────────────────────────────

    pub(crate) fn insert_catalog_item(&self, item: &CatalogItem) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO catalog_items (name, default_unit_cost, default_unit_price)
             VALUES (?1, ?2, ?3)",
            params![
                item.name,
                item.default_unit_cost.to_string(),
                item.default_unit_price.to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_catalog_items(&self) -> Result<Vec<CatalogItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, default_unit_cost, default_unit_price FROM catalog_items ORDER BY name",
        )?;
        let rows = stmt.query_map([], catalog_item_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_catalog_item_by_id(&self, id: i64) -> Result<Option<CatalogItem>> {
        let result = self.conn.query_row(
            "SELECT id, name, default_unit_cost, default_unit_price FROM catalog_items WHERE id = ?1",
            params![id],
            catalog_item_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn delete_catalog_item(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM catalog_items WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Quotes ────────────────────────────────────────────────

    /// Insert or update a quote together with its items, all or nothing.
    /// The snapshot is written exactly as given.
    pub(crate) fn save_quote(&mut self, quote: &Quote) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let snap = &quote.snapshot;
        let event_date = quote.event_date.map(|d| d.format("%Y-%m-%d").to_string());
        let margin = quote.pricing_mode.desired_margin().map(|m| m.to_string());

        let id = match quote.id {
            Some(id) => {
                let updated = tx.execute(
                    "UPDATE quotes SET client_name = ?1, client_phone = ?2, event_name = ?3,
                        event_date = ?4, guest_count = ?5, status = ?6, pricing_mode = ?7,
                        desired_margin = ?8, fixed_cost_share = ?9, variable_cost = ?10,
                        total_sales = ?11, net_profit = ?12, margin_percent = ?13
                     WHERE id = ?14",
                    params![
                        quote.client_name,
                        quote.client_phone,
                        quote.event_name,
                        event_date,
                        quote.guest_count,
                        quote.status.as_str(),
                        quote.pricing_mode.kind(),
                        margin,
                        snap.fixed_cost_share.to_string(),
                        snap.total_variable_cost.to_string(),
                        snap.total_sales.to_string(),
                        snap.net_profit.to_string(),
                        snap.margin_percent.to_string(),
                        id,
                    ],
                )?;
                if updated == 0 {
                    return Err(QuoteError::NotFound(id).into());
                }
                tx.execute("DELETE FROM quote_items WHERE quote_id = ?1", params![id])?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO quotes (client_name, client_phone, event_name, event_date,
                        guest_count, status, pricing_mode, desired_margin, fixed_cost_share,
                        variable_cost, total_sales, net_profit, margin_percent, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    params![
                        quote.client_name,
                        quote.client_phone,
                        quote.event_name,
                        event_date,
                        quote.guest_count,
                        quote.status.as_str(),
                        quote.pricing_mode.kind(),
                        margin,
                        snap.fixed_cost_share.to_string(),
                        snap.total_variable_cost.to_string(),
                        snap.total_sales.to_string(),
                        snap.net_profit.to_string(),
                        snap.margin_percent.to_string(),
                        quote.created_at,
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        for (position, item) in quote.items.iter().enumerate() {
            tx.execute(
                "INSERT INTO quote_items (quote_id, item_key, position, name, quantity, unit_cost, unit_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    item.id,
                    position as i64,
                    item.name,
                    item.quantity,
                    item.unit_cost.to_string(),
                    item.unit_price.map(|p| p.to_string()),
                ],
            )?;
        }

        tx.commit()?;
        Ok(id)
    }

    pub(crate) fn get_quote_by_id(&self, id: i64) -> Result<Option<Quote>> {
        let result = self.conn.query_row(
            &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"),
            params![id],
            quote_from_row,
        );
        match result {
            Ok(mut q) => {
                q.items = self.get_quote_items(id)?;
                Ok(Some(q))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All quotes ordered by event date, optionally limited to one event month.
    pub(crate) fn get_quotes(&self, month: Option<YearMonth>) -> Result<Vec<Quote>> {
        let mut sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = month {
            sql.push_str(&format!(" AND event_date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }
        sql.push_str(" ORDER BY event_date IS NULL, event_date, id");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), quote_from_row)?;
        let mut quotes = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        for quote in &mut quotes {
            if let Some(id) = quote.id {
                quote.items = self.get_quote_items(id)?;
            }
        }
        Ok(quotes)
    }

    fn get_quote_items(&self, quote_id: i64) -> Result<Vec<LineItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_key, name, quantity, unit_cost, unit_price
             FROM quote_items WHERE quote_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![quote_id], |row| {
            let cost: String = row.get(3)?;
            let price: Option<String> = row.get(4)?;
            Ok(LineItem {
                id: row.get(0)?,
                name: row.get(1)?,
                quantity: row.get(2)?,
                unit_cost: Decimal::from_str(&cost).unwrap_or_default(),
                unit_price: price.and_then(|p| Decimal::from_str(&p).ok()),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_quote_status(&self, id: i64, status: QuoteStatus) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE quotes SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(n > 0)
    }

    /// Deletes the quote; its items go with it via `ON DELETE CASCADE`.
    pub(crate) fn delete_quote(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM quotes WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Analytics ─────────────────────────────────────────────

    pub(crate) fn get_quote_stats(&self, month: YearMonth) -> Result<QuoteStats> {
        let mut stats = QuoteStats::default();

        {
            let mut stmt = self
                .conn
                .prepare("SELECT status, COUNT(*) FROM quotes GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (status, count) = row?;
                match QuoteStatus::parse(&status) {
                    Some(QuoteStatus::Draft) => stats.pending += count,
                    Some(QuoteStatus::Scheduled) => stats.scheduled += count,
                    Some(QuoteStatus::Completed) => stats.completed += count,
                    Some(QuoteStatus::Declined) => stats.declined += count,
                    None => tracing::warn!(status, "Ignoring quotes with unknown status"),
                }
            }
        }

        // Summed in Rust: SQLite would go through REAL and lose cents.
        let mut stmt = self.conn.prepare(
            "SELECT total_sales FROM quotes WHERE status = ?1 AND event_date LIKE ?2",
        )?;
        let rows = stmt.query_map(
            params![QuoteStatus::Completed.as_str(), format!("{month}%")],
            |row| row.get::<_, String>(0),
        )?;
        for row in rows {
            stats.revenue += Decimal::from_str(&row?).unwrap_or_default();
        }

        Ok(stats)
    }

    /// Scheduled quotes on or after `from`, soonest first.
    pub(crate) fn get_upcoming_events(&self, from: NaiveDate, limit: u32) -> Result<Vec<Quote>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes
             WHERE status = ?1 AND event_date >= ?2
             ORDER BY event_date, id LIMIT ?3"
        ))?;
        let rows = stmt.query_map(
            params![
                QuoteStatus::Scheduled.as_str(),
                from.format("%Y-%m-%d").to_string(),
                limit
            ],
            quote_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn catalog_item_from_row(row: &Row) -> rusqlite::Result<CatalogItem> {
    let cost: String = row.get(2)?;
    let price: String = row.get(3)?;
    Ok(CatalogItem {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        default_unit_cost: Decimal::from_str(&cost).unwrap_or_default(),
        default_unit_price: Decimal::from_str(&price).unwrap_or_default(),
    })
}

/// Map a `QUOTE_COLUMNS` row. Items are loaded separately.
fn quote_from_row(row: &Row) -> rusqlite::Result<Quote> {
    let decimal = |idx: usize| -> rusqlite::Result<Decimal> {
        let s: String = row.get(idx)?;
        Ok(Decimal::from_str(&s).unwrap_or_default())
    };

    let event_date: Option<String> = row.get(4)?;
    let status: String = row.get(6)?;
    let mode: String = row.get(7)?;
    let margin: Option<String> = row.get(8)?;
    let margin = margin.and_then(|m| Decimal::from_str(&m).ok());

    Ok(Quote {
        id: Some(row.get(0)?),
        client_name: row.get(1)?,
        client_phone: row.get(2)?,
        event_name: row.get(3)?,
        event_date: event_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        guest_count: row.get(5)?,
        status: QuoteStatus::parse(&status).unwrap_or_default(),
        pricing_mode: PricingMode::from_parts(&mode, margin).unwrap_or(PricingMode::FixedPrice),
        items: Vec::new(),
        snapshot: FinancialResult {
            fixed_cost_share: decimal(9)?,
            total_variable_cost: decimal(10)?,
            total_sales: decimal(11)?,
            net_profit: decimal(12)?,
            margin_percent: decimal(13)?,
        },
        created_at: row.get(14)?,
    })
}

#[cfg(test)]
mod tests;
