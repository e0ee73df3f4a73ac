use anyhow::Result;
use chrono::Local;

use crate::db::{Database, QuoteStats};
use crate::models::*;
use crate::pricing::{self, OverheadBreakdown};
use crate::quoting;
use crate::ui::util::clamp_index;

/// Number of scheduled events listed on the dashboard.
const UPCOMING_LIMIT: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Quotes,
    Costs,
    Catalog,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Quotes, Self::Costs, Self::Catalog]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Quotes => write!(f, "Quotes"),
            Self::Costs => write!(f, "Costs"),
            Self::Catalog => write!(f, "Catalog"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteQuote { id: i64, label: String },
    RemoveItem { quote_id: i64, item_id: String, name: String },
    DeleteCost { id: i64, name: String },
    DeleteCatalogItem { id: i64, name: String },
    RepriceAll,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) current_month: YearMonth,

    // Dashboard
    pub(crate) stats: QuoteStats,
    pub(crate) upcoming: Vec<Quote>,
    pub(crate) overhead: Option<OverheadBreakdown>,

    // Quotes
    pub(crate) quotes: Vec<Quote>,
    pub(crate) quote_index: usize,
    pub(crate) quote_scroll: usize,
    pub(crate) item_index: usize,
    pub(crate) stale_ids: Vec<i64>,

    // Costs
    pub(crate) params: BusinessParameters,
    pub(crate) fixed_costs: Vec<FixedCost>,
    pub(crate) cost_index: usize,

    // Catalog
    pub(crate) catalog: Vec<CatalogItem>,
    pub(crate) catalog_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            current_month: YearMonth::current(),

            stats: QuoteStats::default(),
            upcoming: Vec::new(),
            overhead: None,

            quotes: Vec::new(),
            quote_index: 0,
            quote_scroll: 0,
            item_index: 0,
            stale_ids: Vec::new(),

            params: BusinessParameters::default(),
            fixed_costs: Vec::new(),
            cost_index: 0,

            catalog: Vec::new(),
            catalog_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        self.stats = db.get_quote_stats(self.current_month)?;
        self.upcoming = db.get_upcoming_events(Local::now().date_naive(), UPCOMING_LIMIT)?;
        self.refresh_costs(db)?;
        Ok(())
    }

    pub(crate) fn refresh_quotes(&mut self, db: &Database) -> Result<()> {
        self.quotes = db.get_quotes(None)?;
        self.stale_ids = quoting::stale_quotes(db)?
            .iter()
            .filter_map(|s| s.quote.id)
            .collect();
        clamp_index(&mut self.quote_index, self.quotes.len());
        let items = self.selected_quote().map_or(0, |q| q.items.len());
        clamp_index(&mut self.item_index, items);
        Ok(())
    }

    /// Costs are kept in display order: newest month first, recurring last.
    pub(crate) fn refresh_costs(&mut self, db: &Database) -> Result<()> {
        let costs = db.get_fixed_costs()?;
        self.fixed_costs = FixedCost::group_by_scope(&costs)
            .into_iter()
            .flat_map(|(_, members)| members.into_iter().cloned())
            .collect();
        self.params = db.get_parameters()?;
        self.overhead = Some(pricing::breakdown(
            &self.fixed_costs,
            &self.params,
            Some(self.current_month.first_day()),
        ));
        clamp_index(&mut self.cost_index, self.fixed_costs.len());
        Ok(())
    }

    pub(crate) fn refresh_catalog(&mut self, db: &Database) -> Result<()> {
        self.catalog = db.get_catalog_items()?;
        clamp_index(&mut self.catalog_index, self.catalog.len());
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?; // also refreshes costs
        self.refresh_quotes(db)?;
        self.refresh_catalog(db)?;
        Ok(())
    }

    pub(crate) fn selected_quote(&self) -> Option<&Quote> {
        self.quotes.get(self.quote_index)
    }

    pub(crate) fn selected_item(&self) -> Option<&LineItem> {
        self.selected_quote()?.items.get(self.item_index)
    }

    pub(crate) fn selected_cost(&self) -> Option<&FixedCost> {
        self.fixed_costs.get(self.cost_index)
    }

    pub(crate) fn selected_catalog_item(&self) -> Option<&CatalogItem> {
        self.catalog.get(self.catalog_index)
    }

    pub(crate) fn is_stale(&self, quote: &Quote) -> bool {
        quote.id.is_some_and(|id| self.stale_ids.contains(&id))
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
