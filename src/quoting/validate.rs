use rust_decimal::Decimal;

use crate::error::{QuoteError, ValidationError};
use crate::models::{CatalogItem, FixedCost, Quote};
use crate::pricing::PricingMode;

/// Upper bounds on entered values. Line totals and their sums stay far
/// inside `Decimal`'s range, so the engine never overflows.
pub(crate) const MAX_QUANTITY: i64 = 1_000_000;
pub(crate) const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Entry-form rules checked before a quote reaches the engine.
/// Every violation is reported, not just the first.
pub(crate) fn validate_quote(quote: &Quote) -> Result<(), QuoteError> {
    let mut issues = Vec::new();

    if quote.client_name.trim().is_empty() {
        issues.push(ValidationError::MissingField("client name"));
    }
    if quote.event_name.trim().is_empty() {
        issues.push(ValidationError::MissingField("event name"));
    }
    if quote.event_date.is_none() {
        issues.push(ValidationError::MissingField("event date"));
    }

    for item in &quote.items {
        if item.quantity < 1 {
            issues.push(ValidationError::NonPositiveQuantity {
                name: item.name.clone(),
                quantity: item.quantity,
            });
        }
        if item.quantity > MAX_QUANTITY {
            issues.push(ValidationError::QuantityTooLarge {
                name: item.name.clone(),
                quantity: item.quantity,
                max: MAX_QUANTITY,
            });
        }
        check_amount(&mut issues, &item.name, "unit cost", item.unit_cost);
        match item.unit_price {
            Some(price) => check_amount(&mut issues, &item.name, "unit price", price),
            None if quote.pricing_mode == PricingMode::FixedPrice => {
                issues.push(ValidationError::MissingUnitPrice {
                    name: item.name.clone(),
                });
            }
            None => {}
        }
    }

    into_result(issues)
}

pub(crate) fn validate_fixed_cost(cost: &FixedCost) -> Result<(), QuoteError> {
    let mut issues = Vec::new();
    if cost.name.trim().is_empty() {
        issues.push(ValidationError::MissingField("cost name"));
    }
    check_amount(&mut issues, &cost.name, "amount", cost.amount);
    into_result(issues)
}

pub(crate) fn validate_catalog_item(item: &CatalogItem) -> Result<(), QuoteError> {
    let mut issues = Vec::new();
    if item.name.trim().is_empty() {
        issues.push(ValidationError::MissingField("item name"));
    }
    check_amount(&mut issues, &item.name, "unit cost", item.default_unit_cost);
    check_amount(&mut issues, &item.name, "unit price", item.default_unit_price);
    into_result(issues)
}

fn check_amount(
    issues: &mut Vec<ValidationError>,
    name: &str,
    field: &'static str,
    amount: Decimal,
) {
    if amount < Decimal::ZERO {
        issues.push(ValidationError::NegativeAmount {
            name: name.to_string(),
            field,
        });
    } else if amount > Decimal::from(MAX_AMOUNT) {
        issues.push(ValidationError::AmountTooLarge {
            name: name.to_string(),
            field,
            max: MAX_AMOUNT,
        });
    }
}

fn into_result(issues: Vec<ValidationError>) -> Result<(), QuoteError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(QuoteError::Invalid(issues))
    }
}
