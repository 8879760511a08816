//! Currency normalization and grouped breakdowns of holdings.

use crate::types::Holding;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A holding together with its amount in local currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedHolding {
    pub holding: Holding,
    pub amount_local: f64,
}

/// Convert every holding to local currency.
///
/// USD and USDT amounts are multiplied by `fx_rate`; local amounts pass through.
pub fn normalize(holdings: &[Holding], fx_rate: f64) -> Vec<NormalizedHolding> {
    holdings
        .iter()
        .map(|h| {
            let amount_local = if h.currency.is_foreign() {
                h.amount_invested * fx_rate
            } else {
                h.amount_invested
            };
            NormalizedHolding {
                holding: h.clone(),
                amount_local,
            }
        })
        .collect()
}

/// Sum of all normalized amounts.
pub fn total(normalized: &[NormalizedHolding]) -> f64 {
    normalized.iter().map(|n| n.amount_local).sum()
}

/// Sum normalized amounts per key. Keys come back sorted.
pub fn group_by<K, F>(normalized: &[NormalizedHolding], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&Holding) -> K,
{
    let mut groups = BTreeMap::new();
    for n in normalized {
        *groups.entry(key(&n.holding)).or_insert(0.0) += n.amount_local;
    }
    groups
}

/// Breakdown dimension of the portfolio view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    AssetType,
    Broker,
}

impl GroupKey {
    pub fn key_of(&self, holding: &Holding) -> String {
        match self {
            GroupKey::AssetType => holding.asset_type.to_string(),
            GroupKey::Broker => holding.broker.clone(),
        }
    }
}

/// One row of a breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupShare {
    pub key: String,
    pub amount: f64,
    /// Share of the portfolio total, in percent
    pub share_pct: f64,
}

/// Grouped totals with their percentage share of the whole portfolio.
///
/// Shares are 0 when the total is 0 or overflowed to infinity.
pub fn breakdown(normalized: &[NormalizedHolding], key: GroupKey) -> Vec<GroupShare> {
    let total_sum = total(normalized);

    group_by(normalized, |h| key.key_of(h))
        .into_iter()
        .map(|(key, amount)| GroupShare {
            key,
            amount,
            share_pct: if total_sum != 0.0 && total_sum.is_finite() {
                amount / total_sum * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetType, Currency, IncomeType};
    use approx::assert_relative_eq;

    fn sample() -> Vec<Holding> {
        vec![
            Holding::new(AssetType::Cedear, "BALANZ", 50_000.0, Currency::Local, IncomeType::Variable),
            Holding::new(AssetType::Crypto, "BINANCE", 100.0, Currency::Usdt, IncomeType::Variable),
            Holding::new(AssetType::Bond, "BALANZ", 20.0, Currency::Usd, IncomeType::Fixed),
            Holding::new(AssetType::Cedear, "IOL", 30_000.0, Currency::Local, IncomeType::Mixed),
        ]
    }

    #[test]
    fn test_normalize_converts_foreign() {
        let normalized = normalize(&sample(), 1000.0);
        let amounts: Vec<f64> = normalized.iter().map(|n| n.amount_local).collect();
        assert_eq!(amounts, vec![50_000.0, 100_000.0, 20_000.0, 30_000.0]);
        assert_eq!(total(&normalized), 200_000.0);
    }

    #[test]
    fn test_group_by_asset_type() {
        let normalized = normalize(&sample(), 1000.0);
        let groups = group_by(&normalized, |h| h.asset_type);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&AssetType::Cedear], 80_000.0);
        assert_eq!(groups[&AssetType::Crypto], 100_000.0);
        assert_eq!(groups[&AssetType::Bond], 20_000.0);
    }

    #[test]
    fn test_breakdown_by_broker() {
        let normalized = normalize(&sample(), 1000.0);
        let rows = breakdown(&normalized, GroupKey::Broker);

        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["BALANZ", "BINANCE", "IOL"]);
        assert_eq!(rows[0].amount, 70_000.0);
        assert_relative_eq!(rows[0].share_pct, 35.0, max_relative = 1e-12);
        assert_relative_eq!(rows[1].share_pct, 50.0, max_relative = 1e-12);
        assert_relative_eq!(rows[2].share_pct, 15.0, max_relative = 1e-12);
    }

    #[test]
    fn test_groups_partition_total() {
        for rate in [1.0, 350.5, 1234.56] {
            let normalized = normalize(&sample(), rate);
            let expected = total(&normalized);
            for key in [GroupKey::AssetType, GroupKey::Broker] {
                let rows = breakdown(&normalized, key);
                let sum: f64 = rows.iter().map(|r| r.amount).sum();
                let pct: f64 = rows.iter().map(|r| r.share_pct).sum();
                assert_relative_eq!(sum, expected, max_relative = 1e-12);
                assert_relative_eq!(pct, 100.0, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_breakdown_overflowing_total() {
        let holdings = vec![
            Holding::new(AssetType::Bond, "BALANZ", 1e300, Currency::Usd, IncomeType::Fixed),
            Holding::new(AssetType::Stock, "IOL", 5_000.0, Currency::Local, IncomeType::Variable),
        ];
        let normalized = normalize(&holdings, 1e10);
        assert!(total(&normalized).is_infinite());

        let rows = breakdown(&normalized, GroupKey::AssetType);
        assert_eq!(rows[0].key, "Bond");
        assert!(rows[0].amount.is_infinite());
        assert_eq!(rows[1].amount, 5_000.0);
        assert!(rows.iter().all(|r| r.share_pct == 0.0));
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(breakdown(&[], GroupKey::AssetType).is_empty());
    }
}
