//! Heuristic stop-loss / take-profit suggestions.
//!
//! Symbols are classified by substring against fixed volatility groups and
//! each group maps to fixed percentage offsets around the entry price.

use serde::{Deserialize, Serialize};

const CRYPTO: &[&str] = &["BTC", "ETH", "XRP", "SOL", "ADA"];
const LARGE_CAP_TECH: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];
const DEFENSIVE: &[&str] = &["KO", "PG", "JNJ", "WMT", "XOM"];
const LOCAL_CURRENCY: &[&str] = &["ARS", "PESO"];

/// Volatility group a symbol falls into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityClass {
    Crypto,
    LargeCapTech,
    Defensive,
    LocalCurrency,
    Default,
}

impl VolatilityClass {
    /// Classification order. The symbol sets overlap, so the first match wins.
    const PRIORITY: [(VolatilityClass, &'static [&'static str]); 4] = [
        (VolatilityClass::Crypto, CRYPTO),
        (VolatilityClass::LargeCapTech, LARGE_CAP_TECH),
        (VolatilityClass::Defensive, DEFENSIVE),
        (VolatilityClass::LocalCurrency, LOCAL_CURRENCY),
    ];

    /// (stop multiplier, target multiplier)
    pub fn multipliers(&self) -> (f64, f64) {
        match self {
            VolatilityClass::Crypto => (0.92, 1.18),
            VolatilityClass::LargeCapTech => (0.94, 1.12),
            VolatilityClass::Defensive => (0.96, 1.08),
            VolatilityClass::LocalCurrency => (0.90, 1.20),
            VolatilityClass::Default => (0.93, 1.15),
        }
    }
}

/// Suggested exit levels for an entry price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskSuggestion {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub class: VolatilityClass,
}

/// Classify a symbol (case-insensitive substring match).
pub fn classify(symbol: &str) -> VolatilityClass {
    let symbol = symbol.to_uppercase();
    VolatilityClass::PRIORITY
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| symbol.contains(n)))
        .map(|(class, _)| *class)
        .unwrap_or(VolatilityClass::Default)
}

/// Suggest stop-loss and take-profit levels, rounded to 2 decimals.
pub fn suggest(entry_price: f64, symbol: &str) -> RiskSuggestion {
    let class = classify(symbol);
    let (stop, target) = class.multipliers();

    RiskSuggestion {
        stop_loss: round2(entry_price * stop),
        take_profit: round2(entry_price * target),
        class,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
