//! Event pricing engine.
//!
//! Pure arithmetic only: callers pass the cost catalog and business
//! parameters in explicitly, and nothing here touches storage.

mod aggregate;
mod allocator;
mod engine;
mod money;

pub use allocator::{breakdown, OverheadBreakdown};
pub use engine::{price, FinancialResult, PricingMode};
pub use money::{margin_percent, round_money};
