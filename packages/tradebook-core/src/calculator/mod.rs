//! Trade calculators.
//!
//! Pure functions behind the trade log form and the TP/SL calculator:
//!
//! - **Suggestion**: stop-loss / take-profit levels from a volatility table
//! - **Trade**: investment, result, ROI and duration of a completed trade
//! - **Sizing**: position size, potential loss/gain and risk/reward ratio

mod sizing;
mod suggestion;
mod trade;

pub use sizing::{calculate, size, CalculatorView, SizingMetrics};
pub use suggestion::{classify, suggest, RiskSuggestion, VolatilityClass};
pub use trade::{evaluate, TradeInput};
