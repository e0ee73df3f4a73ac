use rust_decimal::Decimal;

/// Template for pre-filling a line item. Not used in pricing once copied.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub id: Option<i64>,
    pub name: String,
    pub default_unit_cost: Decimal,
    pub default_unit_price: Decimal,
}

impl CatalogItem {
    pub fn new(name: String, default_unit_cost: Decimal, default_unit_price: Decimal) -> Self {
        Self {
            id: None,
            name,
            default_unit_cost,
            default_unit_price,
        }
    }

    /// Find a catalog item by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(items: &'a [CatalogItem], name: &str) -> Option<&'a CatalogItem> {
        let lower = name.to_lowercase();
        items.iter().find(|c| c.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
