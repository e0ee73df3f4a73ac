use rust_decimal::Decimal;

use super::CatalogItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Opaque key, unique within the owning quote.
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    pub fn new(name: String, quantity: i64, unit_cost: Decimal, unit_price: Option<Decimal>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            quantity,
            unit_cost,
            unit_price,
        }
    }

    /// Copy a catalog template into a fresh item with quantity 1.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self::new(
            item.name.clone(),
            1,
            item.default_unit_cost,
            Some(item.default_unit_price),
        )
    }

    pub fn total_cost(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }

    pub fn total_price(&self) -> Option<Decimal> {
        self.unit_price.map(|p| p * Decimal::from(self.quantity))
    }
}
