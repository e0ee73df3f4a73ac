use rust_decimal::Decimal;

use super::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostScope {
    /// Charged against every month.
    Recurring,
    /// Charged only against events dated inside this month.
    Period(YearMonth),
}

impl CostScope {
    pub fn applies_to(&self, month: Option<YearMonth>) -> bool {
        match self {
            Self::Recurring => true,
            Self::Period(m) => month == Some(*m),
        }
    }

    pub fn month(&self) -> Option<YearMonth> {
        match self {
            Self::Recurring => None,
            Self::Period(m) => Some(*m),
        }
    }

    /// Empty or "recurring" means recurring; anything else must be `YYYY-MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("recurring") {
            return Some(Self::Recurring);
        }
        YearMonth::parse(trimmed).map(Self::Period)
    }
}

impl std::fmt::Display for CostScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recurring => write!(f, "Recurring"),
            Self::Period(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedCost {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub scope: CostScope,
}

impl FixedCost {
    pub fn new(name: String, amount: Decimal, scope: CostScope) -> Self {
        Self {
            id: None,
            name,
            amount,
            scope,
        }
    }

    pub fn recurring(name: String, amount: Decimal) -> Self {
        Self::new(name, amount, CostScope::Recurring)
    }

    pub fn for_month(name: String, amount: Decimal, month: YearMonth) -> Self {
        Self::new(name, amount, CostScope::Period(month))
    }

    /// Group costs for display: months newest first, recurring costs last.
    pub fn group_by_scope(costs: &[FixedCost]) -> Vec<(CostScope, Vec<&FixedCost>)> {
        let mut groups: Vec<(CostScope, Vec<&FixedCost>)> = Vec::new();
        for cost in costs {
            match groups.iter_mut().find(|(scope, _)| *scope == cost.scope) {
                Some((_, members)) => members.push(cost),
                None => groups.push((cost.scope, vec![cost])),
            }
        }
        groups.sort_by(|(a, _), (b, _)| b.month().cmp(&a.month()));
        groups
    }

    pub fn total(costs: &[&FixedCost]) -> Decimal {
        costs.iter().map(|c| c.amount).sum()
    }
}
