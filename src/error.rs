//! Domain error types. Plumbing errors travel as `anyhow::Error`; these are
//! wrapped inside it so front ends can `downcast_ref` and react.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("item '{name}': quantity must be at least 1 (got {quantity})")]
    NonPositiveQuantity { name: String, quantity: i64 },

    #[error("item '{name}': quantity cannot exceed {max} (got {quantity})")]
    QuantityTooLarge { name: String, quantity: i64, max: i64 },

    #[error("'{name}': {field} cannot be negative")]
    NegativeAmount { name: String, field: &'static str },

    #[error("'{name}': {field} cannot exceed {max}")]
    AmountTooLarge {
        name: String,
        field: &'static str,
        max: i64,
    },

    #[error("item '{name}' needs a unit price for fixed-price quotes")]
    MissingUnitPrice { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Invalid input: {}", join_issues(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Quote #{0} not found")]
    NotFound(i64),

    #[error("Quote #{quote_id} has no item '{item_id}'")]
    ItemNotFound { quote_id: i64, item_id: String },

    #[error("Quote '{0}' has an inconsistent financial snapshot; reprice it first")]
    InconsistentSnapshot(String),
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
