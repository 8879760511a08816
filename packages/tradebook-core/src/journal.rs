//! Trade log analytics: statistics, equity curve and listing order.

use crate::types::Trade;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the trade log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeStats {
    /// Total number of trades
    pub total_trades: usize,
    /// Trades with a positive result
    pub winning_trades: usize,
    /// Win rate percentage
    pub win_rate_percent: f64,
    /// Sum of all results
    pub total_result: f64,
}

/// Compute statistics for a set of trades.
pub fn trade_stats(trades: &[Trade]) -> TradeStats {
    let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
    let win_rate_percent = if !trades.is_empty() {
        (winning_trades as f64 / trades.len() as f64) * 100.0
    } else {
        0.0
    };

    TradeStats {
        total_trades: trades.len(),
        winning_trades,
        win_rate_percent,
        total_result: trades.iter().map(|t| t.metrics.result).sum(),
    }
}

/// One point of the cumulative result curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub result: f64,
    pub cumulative_result: f64,
}

/// Cumulative result ordered by entry date. Trades on the same day keep log order.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.entry_date);

    let mut cumulative = 0.0;
    ordered
        .into_iter()
        .map(|t| {
            cumulative += t.metrics.result;
            EquityPoint {
                date: t.entry_date,
                symbol: t.symbol.clone(),
                result: t.metrics.result,
                cumulative_result: cumulative,
            }
        })
        .collect()
}

/// Newest first: entry date descending, then id descending.
pub fn reverse_chronological(trades: &[Trade]) -> Vec<Trade> {
    let mut ordered = trades.to_vec();
    ordered.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then(b.id.cmp(&a.id)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TradeInput;
    use crate::types::{TradeId, TradeSide, TradeStrategy};

    fn trade(id: u64, day: u32, entry: f64, exit: f64) -> Trade {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let draft = TradeInput {
            entry_date: date,
            exit_date: date,
            symbol: format!("T{}", id),
            side: TradeSide::Buy,
            quantity: 1.0,
            entry_price: entry,
            exit_price: exit,
            strategy: TradeStrategy::Technical,
            notes: String::new(),
        }
        .into_draft()
        .unwrap();
        Trade::from_draft(TradeId(id), draft)
    }

    #[test]
    fn test_stats() {
        let trades = vec![
            trade(1, 3, 100.0, 120.0),
            trade(2, 1, 100.0, 90.0),
            trade(3, 2, 100.0, 100.0),
            trade(4, 5, 50.0, 80.0),
        ];

        let stats = trade_stats(&trades);
        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.win_rate_percent, 50.0);
        assert_eq!(stats.total_result, 40.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = trade_stats(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate_percent, 0.0);
        assert_eq!(stats.total_result, 0.0);
    }

    #[test]
    fn test_equity_curve_sorted_by_entry() {
        let trades = vec![
            trade(1, 3, 100.0, 120.0),
            trade(2, 1, 100.0, 90.0),
            trade(3, 3, 100.0, 105.0),
        ];

        let curve = equity_curve(&trades);
        let cumulative: Vec<f64> = curve.iter().map(|p| p.cumulative_result).collect();
        let symbols: Vec<&str> = curve.iter().map(|p| p.symbol.as_str()).collect();

        assert_eq!(symbols, vec!["T2", "T1", "T3"]);
        assert_eq!(cumulative, vec![-10.0, 10.0, 15.0]);
    }

    #[test]
    fn test_reverse_chronological() {
        let trades = vec![
            trade(1, 3, 100.0, 120.0),
            trade(2, 1, 100.0, 90.0),
            trade(3, 3, 100.0, 105.0),
        ];

        let ids: Vec<u64> = reverse_chronological(&trades).iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
