use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{BusinessParameters, FixedCost, YearMonth};

/// How an event's overhead share was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverheadBreakdown {
    /// Month the relevant costs were selected for; `None` means recurring only.
    pub month: Option<YearMonth>,
    pub total_fixed: Decimal,
    pub expected_events: Decimal,
    pub share: Decimal,
}

impl OverheadBreakdown {
    /// True when the capacity settings leave nothing to divide by.
    pub fn is_degenerate(&self) -> bool {
        self.expected_events <= Decimal::ZERO
    }
}

/// Recurring costs plus the costs scoped to the event's month.
pub fn relevant_costs(
    costs: &[FixedCost],
    event_date: Option<NaiveDate>,
) -> impl Iterator<Item = &FixedCost> {
    let month = event_date.map(YearMonth::of);
    costs.iter().filter(move |c| c.scope.applies_to(month))
}

pub fn breakdown(
    costs: &[FixedCost],
    params: &BusinessParameters,
    event_date: Option<NaiveDate>,
) -> OverheadBreakdown {
    let total_fixed: Decimal = relevant_costs(costs, event_date).map(|c| c.amount).sum();
    let expected_events = params.expected_events_per_month();

    let share = if expected_events > Decimal::ZERO {
        total_fixed
            .checked_div(expected_events)
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    OverheadBreakdown {
        month: event_date.map(YearMonth::of),
        total_fixed,
        expected_events,
        share,
    }
}

/// Fixed-cost share attributable to one event.
///
/// Zero or negative capacity yields a zero share rather than an error.
pub fn allocate(
    costs: &[FixedCost],
    params: &BusinessParameters,
    event_date: Option<NaiveDate>,
) -> Decimal {
    breakdown(costs, params, event_date).share
}
