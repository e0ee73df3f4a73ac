mod catalog_item;
mod fixed_cost;
mod line_item;
mod parameters;
mod quote;
mod year_month;

pub use catalog_item::CatalogItem;
pub use fixed_cost::{CostScope, FixedCost};
pub use line_item::LineItem;
pub use parameters::BusinessParameters;
pub use quote::{Quote, QuoteStatus};
pub use year_month::YearMonth;

#[cfg(test)]
mod tests;
