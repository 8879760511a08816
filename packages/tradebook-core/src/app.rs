//! Application state shared by the front ends.
//!
//! `AppState` is loaded once at start and passed to every handler. Each
//! mutation is validated, written through the store, and only then applied
//! to the in-memory snapshot, so a failed write leaves the session unchanged.

use crate::calculator::{self, CalculatorView, TradeInput};
use crate::config::Config;
use crate::journal::{self, EquityPoint, TradeStats};
use crate::portfolio::PortfolioSummary;
use crate::store::{Store, StoreDocument};
use crate::types::{
    is_known_broker, AssetType, Currency, ExchangeRateSample, Holding, IncomeType, Trade,
    TradeId, DEFAULT_FX_RATE, KNOWN_BROKERS,
};
use crate::{Error, Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Choices offered by the portfolio editor's dropdown columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorOptions {
    pub asset_types: Vec<AssetType>,
    pub brokers: Vec<String>,
    pub currencies: Vec<Currency>,
    pub income_types: Vec<IncomeType>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            asset_types: AssetType::ALL.to_vec(),
            brokers: KNOWN_BROKERS.iter().map(|b| b.to_string()).collect(),
            currencies: Currency::ALL.to_vec(),
            income_types: IncomeType::ALL.to_vec(),
        }
    }
}

/// Portfolio editor view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioView {
    pub holdings: Vec<Holding>,
    pub current_rate: f64,
    pub summary: PortfolioSummary,
    pub options: EditorOptions,
}

/// Trade log view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLogView {
    /// Newest first
    pub trades: Vec<Trade>,
    pub stats: TradeStats,
    pub equity_curve: Vec<EquityPoint>,
}

/// Session state: the store handle plus the last successfully persisted snapshot.
#[derive(Debug)]
pub struct AppState {
    store: Store,
    snapshot: StoreDocument,
    default_fx_rate: f64,
}

impl AppState {
    /// Load state from `store` with the built-in default rate.
    ///
    /// An unreadable store yields an empty session; the failure is logged.
    pub fn load(store: Store) -> Self {
        Self::load_with_default_rate(store, DEFAULT_FX_RATE)
    }

    /// Load state using the configured default rate.
    pub fn with_config(store: Store, config: &Config) -> Self {
        Self::load_with_default_rate(store, config.default_fx_rate)
    }

    fn load_with_default_rate(store: Store, default_fx_rate: f64) -> Self {
        let snapshot = match store.load() {
            Ok(doc) => {
                tracing::debug!(
                    "Loaded {} holdings, {} trades, {} rate samples",
                    doc.holdings.len(),
                    doc.trades.len(),
                    doc.rate_samples.len()
                );
                doc
            }
            Err(e) => {
                tracing::warn!("Could not read store, starting empty: {}", e);
                StoreDocument::default()
            }
        };

        Self {
            store,
            snapshot,
            default_fx_rate,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.snapshot.holdings
    }

    /// Trades in log order (oldest first).
    pub fn trades(&self) -> &[Trade] {
        &self.snapshot.trades
    }

    /// Effective USD rate.
    pub fn current_rate(&self) -> f64 {
        self.snapshot.current_rate(self.default_fx_rate)
    }

    /// Latest rate sample, if one was ever recorded.
    pub fn latest_rate_sample(&self) -> Option<&ExchangeRateSample> {
        self.snapshot.latest_rate()
    }

    // ------------------------------------------------------------------
    // Portfolio
    // ------------------------------------------------------------------

    /// Save the edited portfolio, replacing every stored holding.
    pub fn save_portfolio(&mut self, holdings: Vec<Holding>) -> Result<()> {
        let holdings = validate_holdings(holdings)?;
        self.store.replace_holdings(&holdings)?;
        tracing::info!("Portfolio saved with {} holdings", holdings.len());
        self.snapshot.holdings = holdings;
        Ok(())
    }

    /// Append one holding to the current set and save.
    pub fn add_holding(&mut self, holding: Holding) -> Result<()> {
        let mut holdings = self.snapshot.holdings.clone();
        holdings.push(holding);
        self.save_portfolio(holdings)
    }

    /// Drop the holding at `index` and save. Removing the last one clears the portfolio.
    pub fn remove_holding(&mut self, index: usize) -> Result<Holding> {
        if index >= self.snapshot.holdings.len() {
            return Err(Error::InvalidInput(format!(
                "no holding at index {} ({} holdings)",
                index,
                self.snapshot.holdings.len()
            )));
        }

        let mut holdings = self.snapshot.holdings.clone();
        let removed = holdings.remove(index);
        if holdings.is_empty() {
            self.clear_portfolio()?;
        } else {
            self.save_portfolio(holdings)?;
        }
        Ok(removed)
    }

    /// Remove every holding.
    pub fn clear_portfolio(&mut self) -> Result<()> {
        self.store.replace_holdings(&[])?;
        tracing::info!("Portfolio cleared");
        self.snapshot.holdings.clear();
        Ok(())
    }

    pub fn portfolio_view(&self) -> PortfolioView {
        let current_rate = self.current_rate();
        PortfolioView {
            holdings: self.snapshot.holdings.clone(),
            current_rate,
            summary: PortfolioSummary::from_holdings(&self.snapshot.holdings, current_rate),
            options: EditorOptions::default(),
        }
    }

    // ------------------------------------------------------------------
    // Trade log
    // ------------------------------------------------------------------

    /// Validate and append a trade to the log.
    pub fn record_trade(&mut self, input: TradeInput) -> Result<Trade> {
        let draft = input.into_draft()?;
        let trade = self.store.append_trade(draft)?;
        tracing::info!(
            "Recorded trade {} {} result {:.2}",
            trade.id,
            trade.symbol,
            trade.metrics.result
        );
        self.snapshot.next_trade_id = trade.id.0 + 1;
        self.snapshot.trades.push(trade.clone());
        Ok(trade)
    }

    /// Delete a trade by id.
    pub fn delete_trade(&mut self, id: TradeId) -> Result<Trade> {
        let removed = self.store.delete_trade(id)?;
        tracing::info!("Deleted trade {} {}", removed.id, removed.symbol);
        self.snapshot.trades.retain(|t| t.id != id);
        Ok(removed)
    }

    pub fn trade_log_view(&self) -> TradeLogView {
        TradeLogView {
            trades: journal::reverse_chronological(&self.snapshot.trades),
            stats: journal::trade_stats(&self.snapshot.trades),
            equity_curve: journal::equity_curve(&self.snapshot.trades),
        }
    }

    // ------------------------------------------------------------------
    // Exchange rate
    // ------------------------------------------------------------------

    /// Record a new USD rate; it becomes the current rate.
    pub fn update_rate(&mut self, usd_to_local_rate: f64) -> Result<ExchangeRateSample> {
        if !(usd_to_local_rate.is_finite() && usd_to_local_rate > 0.0) {
            return Err(ValidationError::NonPositiveRate.into());
        }

        let sample = ExchangeRateSample::now(usd_to_local_rate);
        self.store.append_rate(sample)?;
        tracing::info!("USD rate updated to {}", usd_to_local_rate);
        self.snapshot.rate_samples.push(sample);
        Ok(sample)
    }

    // ------------------------------------------------------------------
    // Calculator
    // ------------------------------------------------------------------

    pub fn calculator_view(&self, capital: f64, entry_price: f64, symbol: &str) -> Option<CalculatorView> {
        calculator::calculate(capital, entry_price, symbol)
    }
}

/// Check an edited portfolio before it replaces the stored one.
pub fn validate_holdings(holdings: Vec<Holding>) -> std::result::Result<Vec<Holding>, ValidationError> {
    if holdings.is_empty() {
        return Err(ValidationError::EmptyPortfolio);
    }

    holdings
        .into_iter()
        .enumerate()
        .map(|(row, h)| {
            let h = Holding::new(h.asset_type, &h.broker, h.amount_invested, h.currency, h.income_type);
            if !(h.amount_invested.is_finite() && h.amount_invested > 0.0) {
                return Err(ValidationError::NonPositiveAmount { row });
            }
            if h.broker.is_empty() {
                return Err(ValidationError::EmptyBroker { row });
            }
            if !is_known_broker(&h.broker) {
                tracing::warn!("Holding {} uses unlisted broker {}", row, h.broker);
            }
            Ok(h)
        })
        .collect()
}
