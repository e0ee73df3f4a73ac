use chrono::NaiveDate;

use super::{LineItem, YearMonth};
use crate::pricing::{FinancialResult, PricingMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStatus {
    #[default]
    Draft,
    Scheduled,
    Completed,
    Declined,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Declined => "Declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "pending" => Some(Self::Draft),
            "scheduled" | "booked" => Some(Self::Scheduled),
            "completed" | "done" => Some(Self::Completed),
            "declined" | "lost" => Some(Self::Declined),
            _ => None,
        }
    }

    /// Draft and scheduled quotes still follow catalog changes; closed ones keep their figures.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Scheduled)
    }

    pub fn all() -> &'static [QuoteStatus] {
        &[
            Self::Draft,
            Self::Scheduled,
            Self::Completed,
            Self::Declined,
        ]
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced proposal for one event.
///
/// `snapshot` caches the last engine result for `items` under the cost catalog
/// and parameters in force when the quote was saved. Only the quoting layer
/// writes it.
#[derive(Debug, Clone)]
pub struct Quote {
    pub id: Option<i64>,
    pub client_name: String,
    pub client_phone: String,
    pub event_name: String,
    pub event_date: Option<NaiveDate>,
    pub guest_count: u32,
    pub status: QuoteStatus,
    pub pricing_mode: PricingMode,
    pub items: Vec<LineItem>,
    pub snapshot: FinancialResult,
    pub created_at: String,
}

impl Quote {
    pub fn new(
        client_name: String,
        event_name: String,
        event_date: Option<NaiveDate>,
        pricing_mode: PricingMode,
    ) -> Self {
        Self {
            id: None,
            client_name,
            client_phone: String::new(),
            event_name,
            event_date,
            guest_count: 0,
            status: QuoteStatus::Draft,
            pricing_mode,
            items: Vec::new(),
            snapshot: FinancialResult::default(),
            created_at: String::new(),
        }
    }

    pub fn event_month(&self) -> Option<YearMonth> {
        self.event_date.map(YearMonth::of)
    }

    pub fn find_item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn remove_item(&mut self, item_id: &str) -> Option<LineItem> {
        let idx = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(idx))
    }

    /// Short label used in lists and confirmations.
    pub fn label(&self) -> String {
        format!("{} ({})", self.event_name, self.client_name)
    }
}
