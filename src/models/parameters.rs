use rust_decimal::Decimal;

/// Capacity settings used to spread fixed costs across events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessParameters {
    /// Percent of bookable days expected to be sold, 0 to 100.
    pub occupancy_rate: Decimal,
    pub working_days_per_month: i32,
}

impl Default for BusinessParameters {
    fn default() -> Self {
        Self {
            occupancy_rate: Decimal::from(70),
            working_days_per_month: 22,
        }
    }
}

impl BusinessParameters {
    pub fn new(occupancy_rate: Decimal, working_days_per_month: i32) -> Self {
        Self {
            occupancy_rate,
            working_days_per_month,
        }
    }

    /// `working_days * occupancy / 100`, the number of events fixed costs are spread over.
    /// Zero when either input is zero or negative, or when the product does not fit.
    pub fn expected_events_per_month(&self) -> Decimal {
        if self.occupancy_rate <= Decimal::ZERO || self.working_days_per_month <= 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.working_days_per_month)
            .checked_mul(self.occupancy_rate / Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn has_capacity(&self) -> bool {
        self.expected_events_per_month() > Decimal::ZERO
    }
}
