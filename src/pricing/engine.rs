use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::aggregate::aggregate;
use super::allocator::allocate;
use super::money::{margin_percent, round_money};
use crate::models::{BusinessParameters, FixedCost, LineItem};

/// How a quote turns costs into a selling price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// Every item carries its own unit price.
    FixedPrice,
    /// Sell at total cost marked up to the desired margin percent.
    CostPlusMargin(Decimal),
}

impl PricingMode {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FixedPrice => "fixed-price",
            Self::CostPlusMargin(_) => "cost-plus",
        }
    }

    pub fn desired_margin(&self) -> Option<Decimal> {
        match self {
            Self::FixedPrice => None,
            Self::CostPlusMargin(m) => Some(*m),
        }
    }

    /// Rebuild from the stored kind and margin columns.
    pub fn from_parts(kind: &str, desired_margin: Option<Decimal>) -> Option<Self> {
        match (kind, desired_margin) {
            ("fixed-price", _) => Some(Self::FixedPrice),
            ("cost-plus", Some(m)) => Some(Self::CostPlusMargin(m)),
            _ => None,
        }
    }

    /// Accepts `fixed`, `fixed-price`, `margin:<pct>`, `cost-plus:<pct>` or a bare `<pct>%`.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if lower == "fixed" || lower == "fixed-price" {
            return Some(Self::FixedPrice);
        }
        let pct = lower
            .strip_prefix("margin:")
            .or_else(|| lower.strip_prefix("cost-plus:"))
            .or_else(|| lower.strip_suffix('%'))?;
        Decimal::from_str(pct.trim().trim_end_matches('%'))
            .ok()
            .map(Self::CostPlusMargin)
    }
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedPrice => write!(f, "Fixed price"),
            Self::CostPlusMargin(m) => write!(f, "Cost plus {m}% margin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinancialResult {
    pub fixed_cost_share: Decimal,
    pub total_variable_cost: Decimal,
    pub total_sales: Decimal,
    pub net_profit: Decimal,
    pub margin_percent: Decimal,
}

impl FinancialResult {
    /// Two-decimal form used for persistence and hand-off to exporters.
    ///
    /// Net profit is re-derived from the rounded components so that
    /// `net_profit == total_sales - total_variable_cost - fixed_cost_share`
    /// holds exactly.
    pub fn rounded(&self) -> Self {
        let fixed_cost_share = round_money(self.fixed_cost_share, 2);
        let total_variable_cost = round_money(self.total_variable_cost, 2);
        let total_sales = round_money(self.total_sales, 2);
        let net_profit = total_sales - total_variable_cost - fixed_cost_share;
        Self {
            fixed_cost_share,
            total_variable_cost,
            total_sales,
            net_profit,
            margin_percent: round_money(margin_percent(net_profit, total_sales), 2),
        }
    }

    pub fn is_consistent(&self) -> bool {
        let expected = self.total_sales - self.total_variable_cost - self.fixed_cost_share;
        round_money(self.net_profit, 2) == round_money(expected, 2)
    }

    pub fn total_cost(&self) -> Decimal {
        self.fixed_cost_share + self.total_variable_cost
    }
}

/// Selling price that yields `desired_margin_percent` of sales as profit.
///
/// At 100% or more the markup is undefined, so the price falls back to
/// break-even (price equals cost).
pub fn selling_price(total_event_cost: Decimal, desired_margin_percent: Decimal) -> Decimal {
    if desired_margin_percent >= Decimal::ONE_HUNDRED {
        return total_event_cost;
    }
    let keep = Decimal::ONE - desired_margin_percent / Decimal::ONE_HUNDRED;
    total_event_cost
        .checked_div(keep)
        .unwrap_or(total_event_cost)
}

/// Price one event. Pure: the same inputs always give the same result.
pub fn price(
    mode: &PricingMode,
    items: &[LineItem],
    costs: &[FixedCost],
    params: &BusinessParameters,
    event_date: Option<NaiveDate>,
) -> FinancialResult {
    let fixed_cost_share = allocate(costs, params, event_date);
    let totals = aggregate(items);

    let (total_sales, net_profit) = match mode {
        PricingMode::FixedPrice => {
            // Unpriced items are rejected by validation; treat them as no sales here.
            let sales = totals.total_sale_if_priced.unwrap_or(Decimal::ZERO);
            (sales, sales - totals.total_cost - fixed_cost_share)
        }
        PricingMode::CostPlusMargin(desired) => {
            let total_event_cost = fixed_cost_share + totals.total_cost;
            let sales = selling_price(total_event_cost, *desired);
            (sales, sales - total_event_cost)
        }
    };

    FinancialResult {
        fixed_cost_share,
        total_variable_cost: totals.total_cost,
        total_sales,
        net_profit,
        margin_percent: margin_percent(net_profit, total_sales),
    }
}
