//! Core data types for the Tradebook tracker.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Local-currency units per USD used when no rate sample has been recorded.
pub const DEFAULT_FX_RATE: f64 = 1000.0;

/// Brokers offered by the portfolio editor.
pub const KNOWN_BROKERS: &[&str] = &[
    "BALANZ",
    "IOL",
    "BULL MARKET",
    "ECO VALORES",
    "BINANCE",
    "PPI",
    "COINBASE",
    "RAVA",
    "BYMA",
    "BROU",
    "BANCO GALICIA",
    "BANCO SANTANDER",
    "BANCO ICBC",
    "MERCADO PAGO",
    "RIPIO",
    "LETSRIPO",
];

/// Whether a broker name is one of [`KNOWN_BROKERS`] (case-insensitive).
pub fn is_known_broker(broker: &str) -> bool {
    let broker = broker.trim().to_uppercase();
    KNOWN_BROKERS.iter().any(|b| *b == broker)
}

/// Kind of instrument a holding is invested in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetType {
    #[serde(rename = "CEDEAR")]
    Cedear,
    Stock,
    Bond,
    Fund,
    Crypto,
    Note,
    Bill,
    Other,
    Repo,
    #[serde(rename = "Cash-FX")]
    CashFx,
}

impl AssetType {
    pub const ALL: [AssetType; 10] = [
        AssetType::Cedear,
        AssetType::Stock,
        AssetType::Bond,
        AssetType::Fund,
        AssetType::Crypto,
        AssetType::Note,
        AssetType::Bill,
        AssetType::Other,
        AssetType::Repo,
        AssetType::CashFx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Cedear => "CEDEAR",
            AssetType::Stock => "Stock",
            AssetType::Bond => "Bond",
            AssetType::Fund => "Fund",
            AssetType::Crypto => "Crypto",
            AssetType::Note => "Note",
            AssetType::Bill => "Bill",
            AssetType::Other => "Other",
            AssetType::Repo => "Repo",
            AssetType::CashFx => "Cash-FX",
        }
    }
}

/// Currency a holding amount is denominated in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Local,
    Usd,
    Usdt,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Local, Currency::Usd, Currency::Usdt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Local => "LOCAL",
            Currency::Usd => "USD",
            Currency::Usdt => "USDT",
        }
    }

    /// Amounts in this currency are converted with the USD rate.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Currency::Usd | Currency::Usdt)
    }
}

/// Income profile of a holding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncomeType {
    Variable,
    Fixed,
    Mixed,
}

impl IncomeType {
    pub const ALL: [IncomeType; 3] = [IncomeType::Variable, IncomeType::Fixed, IncomeType::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Variable => "Variable",
            IncomeType::Fixed => "Fixed",
            IncomeType::Mixed => "Mixed",
        }
    }
}

/// A long-term position in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Instrument kind
    pub asset_type: AssetType,
    /// Broker name (uppercase)
    pub broker: String,
    /// Amount invested, in `currency`
    pub amount_invested: f64,
    /// Denomination of `amount_invested`
    pub currency: Currency,
    /// Income profile
    pub income_type: IncomeType,
}

impl Holding {
    /// Create a new holding. The broker name is trimmed and upper-cased.
    pub fn new(
        asset_type: AssetType,
        broker: &str,
        amount_invested: f64,
        currency: Currency,
        income_type: IncomeType,
    ) -> Self {
        Self {
            asset_type,
            broker: broker.trim().to_uppercase(),
            amount_invested,
            currency,
            income_type,
        }
    }
}

/// Stable identifier of a trade log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade direction. Informational only: every log entry is a completed buy+sell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Analysis style behind a trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeStrategy {
    Technical,
    Fundamental,
    Mixed,
}

/// Metrics derived from a completed trade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeMetrics {
    /// entry_price * quantity
    pub investment_total: f64,
    /// (exit_price - entry_price) * quantity
    pub result: f64,
    /// result / investment_total * 100, or 0 when nothing was invested
    pub roi_pct: f64,
    /// Calendar days between entry and exit
    pub duration_days: i64,
}

impl TradeMetrics {
    /// False when any amount overflowed or is NaN; JSON cannot store those.
    pub fn is_finite(&self) -> bool {
        self.investment_total.is_finite() && self.result.is_finite() && self.roi_pct.is_finite()
    }
}

/// A trade accepted into the log, before the store assigns its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeDraft {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
    pub strategy: TradeStrategy,
    #[serde(default)]
    pub notes: String,
}

/// A completed trade in the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    /// Stable identifier
    pub id: TradeId,
    /// Date the position was opened
    pub entry_date: NaiveDate,
    /// Date the position was closed
    pub exit_date: NaiveDate,
    /// Asset symbol (uppercase)
    pub symbol: String,
    /// Buy or Sell
    pub side: TradeSide,
    /// Units traded
    pub quantity: f64,
    /// Price per unit at entry
    pub entry_price: f64,
    /// Price per unit at exit
    pub exit_price: f64,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
    pub strategy: TradeStrategy,
    #[serde(default)]
    pub notes: String,
    /// When the entry was written to the log
    pub recorded_at: DateTime<Utc>,
}

impl Trade {
    /// Attach a store-assigned id to a draft.
    pub fn from_draft(id: TradeId, draft: TradeDraft) -> Self {
        Self {
            id,
            entry_date: draft.entry_date,
            exit_date: draft.exit_date,
            symbol: draft.symbol,
            side: draft.side,
            quantity: draft.quantity,
            entry_price: draft.entry_price,
            exit_price: draft.exit_price,
            metrics: draft.metrics,
            strategy: draft.strategy,
            notes: draft.notes,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_winner(&self) -> bool {
        self.metrics.result > 0.0
    }
}

/// A manually entered USD to local-currency exchange rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRateSample {
    pub timestamp: DateTime<Utc>,
    pub usd_to_local_rate: f64,
}

impl ExchangeRateSample {
    /// Sample stamped with the current time.
    pub fn now(usd_to_local_rate: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            usd_to_local_rate,
        }
    }
}

// ============================================================================
// Text parsing for front ends
// ============================================================================

fn normalize_token(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "cedear" | "cedears" => Ok(AssetType::Cedear),
            "stock" | "stocks" => Ok(AssetType::Stock),
            "bond" | "bonds" => Ok(AssetType::Bond),
            "fund" | "funds" => Ok(AssetType::Fund),
            "crypto" => Ok(AssetType::Crypto),
            "note" | "notes" => Ok(AssetType::Note),
            "bill" | "bills" => Ok(AssetType::Bill),
            "other" => Ok(AssetType::Other),
            "repo" => Ok(AssetType::Repo),
            "cashfx" | "fx" => Ok(AssetType::CashFx),
            _ => Err(Error::InvalidInput(format!("unknown asset type: {}", s))),
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "local" => Ok(Currency::Local),
            "usd" => Ok(Currency::Usd),
            "usdt" => Ok(Currency::Usdt),
            _ => Err(Error::InvalidInput(format!("unknown currency: {}", s))),
        }
    }
}

impl FromStr for IncomeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "variable" => Ok(IncomeType::Variable),
            "fixed" => Ok(IncomeType::Fixed),
            "mixed" => Ok(IncomeType::Mixed),
            _ => Err(Error::InvalidInput(format!("unknown income type: {}", s))),
        }
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            _ => Err(Error::InvalidInput(format!("unknown trade side: {}", s))),
        }
    }
}

impl FromStr for TradeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_token(s).as_str() {
            "technical" => Ok(TradeStrategy::Technical),
            "fundamental" => Ok(TradeStrategy::Fundamental),
            "mixed" => Ok(TradeStrategy::Mixed),
            _ => Err(Error::InvalidInput(format!("unknown strategy: {}", s))),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_new_normalizes_broker() {
        let holding = Holding::new(
            AssetType::Cedear,
            "  bull market ",
            1500.0,
            Currency::Local,
            IncomeType::Variable,
        );
        assert_eq!(holding.broker, "BULL MARKET");
        assert!(is_known_broker(&holding.broker));
        assert!(!is_known_broker("MY BANK"));
    }

    #[test]
    fn test_enum_serde_names() {
        assert_eq!(serde_json::to_string(&AssetType::CashFx).unwrap(), "\"Cash-FX\"");
        assert_eq!(serde_json::to_string(&AssetType::Cedear).unwrap(), "\"CEDEAR\"");
        assert_eq!(serde_json::to_string(&Currency::Usdt).unwrap(), "\"USDT\"");
        assert_eq!(serde_json::to_string(&TradeSide::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("Cash-FX".parse::<AssetType>().unwrap(), AssetType::CashFx);
        assert_eq!("cedears".parse::<AssetType>().unwrap(), AssetType::Cedear);
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("FIXED".parse::<IncomeType>().unwrap(), IncomeType::Fixed);
        assert_eq!("Technical".parse::<TradeStrategy>().unwrap(), TradeStrategy::Technical);
        assert!(matches!("EUR".parse::<Currency>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_currency_is_foreign() {
        assert!(!Currency::Local.is_foreign());
        assert!(Currency::Usd.is_foreign());
        assert!(Currency::Usdt.is_foreign());
    }

    #[test]
    fn test_trade_flattens_metrics() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let draft = TradeDraft {
            entry_date: date,
            exit_date: date,
            symbol: "BTC".to_string(),
            side: TradeSide::Buy,
            quantity: 1.0,
            entry_price: 100.0,
            exit_price: 110.0,
            metrics: TradeMetrics {
                investment_total: 100.0,
                result: 10.0,
                roi_pct: 10.0,
                duration_days: 0,
            },
            strategy: TradeStrategy::Mixed,
            notes: String::new(),
        };
        let trade = Trade::from_draft(TradeId(7), draft);
        let value = serde_json::to_value(&trade).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["result"], 10.0);
        assert!(trade.is_winner());
    }

    #[test]
    fn test_api_response_envelope() {
        let holding = Holding::new(AssetType::CashFx, "iol", 250.0, Currency::Usd, IncomeType::Fixed);
        let value = serde_json::to_value(ApiResponse::ok(vec![holding])).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"][0]["asset_type"], "Cash-FX");
        assert_eq!(value["data"][0]["broker"], "IOL");
        assert!(value.get("error").is_none());

        let failed = ApiResponse::<Holding>::err(Error::TradeNotFound(TradeId(3)).to_string());
        let value = serde_json::to_value(failed).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "Trade not found: 3");
        assert!(value.get("data").is_none());
    }
}
