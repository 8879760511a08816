//! Tradebook Core - Portfolio, trade log and risk calculator library.
//!
//! This crate provides the computation and persistence layer of Tradebook:
//!
//! - **Currency**: locale money parsing and formatting
//! - **Calculator**: stop-loss/take-profit suggestions, trade metrics, position sizing
//! - **Portfolio**: currency normalization and grouped breakdowns
//! - **Journal**: trade log statistics and equity curve
//! - **Store / App**: single-writer JSON store and explicit application state
//!
//! # Example
//!
//! ```rust,no_run
//! use tradebook_core::app::AppState;
//! use tradebook_core::store::Store;
//!
//! // Open the store at the default path (~/.local/share/tradebook/store.json)
//! let mut app = AppState::load(Store::open_default());
//!
//! // Record a new exchange rate sample
//! app.update_rate(1150.0).expect("rate saved");
//!
//! // Live calculator view for BTC at 866 with 10,000 capital
//! if let Some(view) = app.calculator_view(10_000.0, 866.0, "BTC") {
//!     println!("SL {} / TP {}", view.suggestion.stop_loss, view.suggestion.take_profit);
//! }
//! ```

pub mod app;
pub mod calculator;
pub mod config;
pub mod currency;
pub mod journal;
pub mod portfolio;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, AssetType, Currency, ExchangeRateSample, Holding, IncomeType, Trade, TradeDraft,
    TradeId, TradeMetrics, TradeSide, TradeStrategy, DEFAULT_FX_RATE, KNOWN_BROKERS,
};

// Re-export main functionality
pub use calculator::{
    calculate, evaluate, size, suggest, CalculatorView, RiskSuggestion, SizingMetrics,
    TradeInput, VolatilityClass,
};
pub use currency::{format, parse, parse_or_zero, ParseFailure};
pub use journal::{equity_curve, trade_stats, EquityPoint, TradeStats};
pub use portfolio::{breakdown, group_by, normalize, GroupKey, GroupShare, NormalizedHolding};

use std::path::PathBuf;

/// Reasons a submission is rejected before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Quantity must be greater than 0")]
    NonPositiveQuantity,

    #[error("Entry price must be greater than 0")]
    NonPositiveEntryPrice,

    #[error("Exit price must be greater than 0")]
    NonPositiveExitPrice,

    #[error("Exit date {exit} is before entry date {entry}")]
    ExitBeforeEntry {
        entry: chrono::NaiveDate,
        exit: chrono::NaiveDate,
    },

    #[error("Trade amounts are too large to record")]
    AmountOutOfRange,

    #[error("Asset symbol is required")]
    EmptySymbol,

    #[error("Portfolio must contain at least one holding")]
    EmptyPortfolio,

    #[error("Holding {row}: amount invested must be greater than 0")]
    NonPositiveAmount { row: usize },

    #[error("Holding {row}: broker is required")]
    EmptyBroker { row: usize },

    #[error("Exchange rate must be greater than 0")]
    NonPositiveRate,
}

/// Error types for tradebook-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Store file {} is corrupted: {source}", .path.display())]
    StoreCorrupted {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Trade not found: {0}")]
    TradeNotFound(TradeId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for tradebook-core operations.
pub type Result<T> = std::result::Result<T, Error>;
