//! Position sizing and the calculator view.

use super::suggestion::{suggest, RiskSuggestion};
use serde::{Deserialize, Serialize};

/// Risk metrics for a planned trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SizingMetrics {
    /// entry_price - stop_loss
    pub risk_per_unit: f64,
    /// take_profit - entry_price
    pub reward_per_unit: f64,
    /// reward / risk, 0 unless risk is positive
    pub risk_reward_ratio: f64,
    /// Units purchasable with the capital
    pub position_size: f64,
    /// position_size * entry_price
    pub investment_total: f64,
    /// Loss if the stop is hit
    pub potential_loss: f64,
    /// Gain if the target is hit
    pub potential_gain: f64,
}

/// Size a position.
///
/// Returns `None` unless entry price, stop-loss and take-profit are all
/// positive. A stop above the entry gives a negative risk per unit; the
/// ratio then reads 0 and the potential loss is reported negative as-is.
pub fn size(capital: f64, entry_price: f64, stop_loss: f64, take_profit: f64) -> Option<SizingMetrics> {
    if !(entry_price > 0.0 && stop_loss > 0.0 && take_profit > 0.0) {
        return None;
    }

    let risk_per_unit = entry_price - stop_loss;
    let reward_per_unit = take_profit - entry_price;
    let risk_reward_ratio = if risk_per_unit > 0.0 {
        reward_per_unit / risk_per_unit
    } else {
        0.0
    };
    let position_size = capital / entry_price;

    Some(SizingMetrics {
        risk_per_unit,
        reward_per_unit,
        risk_reward_ratio,
        position_size,
        investment_total: position_size * entry_price,
        potential_loss: risk_per_unit * position_size,
        potential_gain: reward_per_unit * position_size,
    })
}

/// Calculator view: suggested levels plus the sizing they imply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculatorView {
    pub symbol: String,
    pub entry_price: f64,
    pub capital: f64,
    pub suggestion: RiskSuggestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<SizingMetrics>,
}

/// Compute the calculator view. `None` until a positive entry price and a symbol are given.
pub fn calculate(capital: f64, entry_price: f64, symbol: &str) -> Option<CalculatorView> {
    let symbol = symbol.trim();
    if !(entry_price > 0.0) || symbol.is_empty() {
        return None;
    }

    let suggestion = suggest(entry_price, symbol);
    let sizing = size(
        capital,
        entry_price,
        suggestion.stop_loss,
        suggestion.take_profit,
    );

    Some(CalculatorView {
        symbol: symbol.to_uppercase(),
        entry_price,
        capital,
        suggestion,
        sizing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_size_reference_plan() {
        let m = size(10_000.0, 866.0, 796.72, 1021.88).unwrap();

        assert_relative_eq!(m.position_size, 11.547, epsilon = 1e-3);
        assert_relative_eq!(m.potential_loss, 800.0, epsilon = 1e-6);
        assert_relative_eq!(m.potential_gain, 1800.0, epsilon = 1e-6);
        assert_relative_eq!(m.risk_reward_ratio, 2.25, epsilon = 1e-9);
        assert_relative_eq!(m.investment_total, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_size_requires_positive_levels() {
        assert!(size(10_000.0, 0.0, 90.0, 110.0).is_none());
        assert!(size(10_000.0, 100.0, 0.0, 110.0).is_none());
        assert!(size(10_000.0, 100.0, 90.0, -1.0).is_none());
    }

    #[test]
    fn test_size_zero_risk() {
        let m = size(1_000.0, 100.0, 100.0, 120.0).unwrap();
        assert_eq!(m.risk_per_unit, 0.0);
        assert_eq!(m.risk_reward_ratio, 0.0);
        assert_eq!(m.potential_loss, 0.0);
        assert_eq!(m.potential_gain, 200.0);
    }

    #[test]
    fn test_size_inverted_stop_passes_through() {
        let m = size(1_000.0, 100.0, 110.0, 120.0).unwrap();
        assert_eq!(m.risk_per_unit, -10.0);
        assert_eq!(m.risk_reward_ratio, 0.0);
        assert_eq!(m.potential_loss, -100.0);
    }

    #[test]
    fn test_calculate_view() {
        let view = calculate(10_000.0, 866.0, "btc").unwrap();
        assert_eq!(view.symbol, "BTC");
        assert_eq!(view.suggestion.stop_loss, 796.72);
        assert_eq!(view.suggestion.take_profit, 1021.88);

        let sizing = view.sizing.unwrap();
        assert_relative_eq!(sizing.risk_reward_ratio, 2.25, epsilon = 1e-6);
    }

    #[test]
    fn test_calculate_needs_inputs() {
        assert!(calculate(10_000.0, 0.0, "BTC").is_none());
        assert!(calculate(10_000.0, 866.0, "  ").is_none());
    }
}
