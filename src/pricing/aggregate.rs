use rust_decimal::Decimal;

use crate::models::LineItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    pub total_cost: Decimal,
    /// Present only when every item carries a unit price.
    pub total_sale_if_priced: Option<Decimal>,
}

/// Sum cost and, when fully priced, sale value across line items.
/// Quantities are assumed validated upstream.
pub fn aggregate(items: &[LineItem]) -> ItemTotals {
    let total_cost = items.iter().map(LineItem::total_cost).sum();
    let total_sale_if_priced = items
        .iter()
        .map(LineItem::total_price)
        .sum::<Option<Decimal>>();

    ItemTotals {
        total_cost,
        total_sale_if_priced,
    }
}
