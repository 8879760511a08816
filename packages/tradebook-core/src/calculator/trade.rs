//! Completed-trade metrics and trade form validation.

use crate::types::{TradeDraft, TradeMetrics, TradeSide, TradeStrategy};
use crate::{Result, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Compute the metrics of a completed buy+sell.
///
/// ROI is 0 when nothing was invested. Duration is the calendar-day
/// difference and is negative if the dates are inverted; such trades are
/// rejected by [`TradeInput::validate`] before they reach the log.
pub fn evaluate(
    entry_price: f64,
    exit_price: f64,
    quantity: f64,
    entry_date: NaiveDate,
    exit_date: NaiveDate,
) -> TradeMetrics {
    let investment_total = entry_price * quantity;
    let result = (exit_price - entry_price) * quantity;
    let roi_pct = if investment_total != 0.0 {
        result / investment_total * 100.0
    } else {
        0.0
    };

    TradeMetrics {
        investment_total,
        result,
        roi_pct,
        duration_days: (exit_date - entry_date).num_days(),
    }
}

/// Trade form as submitted by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeInput {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub strategy: TradeStrategy,
    #[serde(default)]
    pub notes: String,
}

impl TradeInput {
    /// Live preview of the metrics, shown before the form is submitted.
    pub fn preview(&self) -> TradeMetrics {
        evaluate(
            self.entry_price,
            self.exit_price,
            self.quantity,
            self.entry_date,
            self.exit_date,
        )
    }

    /// Check the acceptance preconditions of the trade log.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.exit_date < self.entry_date {
            return Err(ValidationError::ExitBeforeEntry {
                entry: self.entry_date,
                exit: self.exit_date,
            });
        }
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        // `!(x > 0.0)` also rejects NaN
        if !(self.quantity > 0.0) {
            return Err(ValidationError::NonPositiveQuantity);
        }
        if !(self.entry_price > 0.0) {
            return Err(ValidationError::NonPositiveEntryPrice);
        }
        if !(self.exit_price > 0.0) {
            return Err(ValidationError::NonPositiveExitPrice);
        }
        if !self.preview().is_finite() {
            return Err(ValidationError::AmountOutOfRange);
        }
        Ok(())
    }

    /// Validate and turn the form into a log entry draft.
    pub fn into_draft(self) -> Result<TradeDraft> {
        self.validate()?;
        let metrics = self.preview();

        Ok(TradeDraft {
            entry_date: self.entry_date,
            exit_date: self.exit_date,
            symbol: self.symbol.trim().to_uppercase(),
            side: self.side,
            quantity: self.quantity,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            metrics,
            strategy: self.strategy,
            notes: self.notes.trim().to_string(),
        })
    }
}
