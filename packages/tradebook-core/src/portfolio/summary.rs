//! Portfolio summary shown above the editor.

use super::aggregate::{breakdown, normalize, total, GroupKey, GroupShare};
use crate::types::Holding;
use serde::{Deserialize, Serialize};

/// Totals and breakdowns of the portfolio in local currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of all holdings converted to local currency
    pub total_invested_local: f64,
    /// Number of holdings
    pub holding_count: usize,
    /// USD rate used for the conversion
    pub fx_rate: f64,
    /// Distribution by asset type
    pub by_asset_type: Vec<GroupShare>,
    /// Distribution by broker
    pub by_broker: Vec<GroupShare>,
}

impl PortfolioSummary {
    /// Summarize holdings at the given USD rate.
    pub fn from_holdings(holdings: &[Holding], fx_rate: f64) -> Self {
        let normalized = normalize(holdings, fx_rate);

        Self {
            total_invested_local: total(&normalized),
            holding_count: holdings.len(),
            fx_rate,
            by_asset_type: breakdown(&normalized, GroupKey::AssetType),
            by_broker: breakdown(&normalized, GroupKey::Broker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetType, Currency, IncomeType};
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_totals() {
        let holdings = vec![
            Holding::new(AssetType::Stock, "PPI", 2_000.0, Currency::Local, IncomeType::Variable),
            Holding::new(AssetType::Crypto, "RIPIO", 3.0, Currency::Usd, IncomeType::Variable),
        ];

        let summary = PortfolioSummary::from_holdings(&holdings, 1_000.0);

        assert_eq!(summary.total_invested_local, 5_000.0);
        assert_eq!(summary.holding_count, 2);
        assert_eq!(summary.by_asset_type.len(), 2);
        assert_eq!(summary.by_asset_type[0].key, "Crypto");
        assert_relative_eq!(summary.by_asset_type[0].share_pct, 60.0, max_relative = 1e-12);
        assert_eq!(summary.by_broker[0].key, "PPI");
    }

    #[test]
    fn test_summary_empty() {
        let summary = PortfolioSummary::from_holdings(&[], 1_000.0);
        assert_eq!(summary.holding_count, 0);
        assert_eq!(summary.total_invested_local, 0.0);
        assert!(summary.by_broker.is_empty());
    }
}
