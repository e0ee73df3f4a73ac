use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `places` decimals using banker's rounding (midpoint to even).
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// `profit / sales * 100`, or zero when there are no sales to divide by.
pub fn margin_percent(net_profit: Decimal, total_sales: Decimal) -> Decimal {
    if total_sales > Decimal::ZERO {
        net_profit
            .checked_div(total_sales)
            .map_or(Decimal::ZERO, |ratio| ratio * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    }
}
