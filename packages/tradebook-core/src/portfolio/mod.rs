//! Portfolio aggregation module.
//!
//! Converts holdings to local currency and produces grouped totals.

mod aggregate;
mod summary;

pub use aggregate::{breakdown, group_by, normalize, total, GroupKey, GroupShare, NormalizedHolding};
pub use summary::PortfolioSummary;
