//! Tradebook CLI - Command line interface for the portfolio, trade log and calculator.
//!
//! Every command prints a single `ApiResponse` JSON document on stdout.
//! Logs go to stderr.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tradebook_core::{
    app::AppState,
    calculator::TradeInput,
    config::Config,
    currency,
    store::Store,
    ApiResponse, AssetType, Currency, Holding, IncomeType, Result, TradeId, TradeSide,
    TradeStrategy,
};

#[derive(Parser)]
#[command(name = "tradebook")]
#[command(about = "Tradebook CLI - portfolio, trade log and TP/SL calculator")]
#[command(version)]
struct Cli {
    /// Store file (overrides config and TRADEBOOK_STORE_FILE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio editor commands
    Portfolio {
        #[command(subcommand)]
        action: PortfolioAction,
    },
    /// Trade log commands
    Trade {
        #[command(subcommand)]
        action: TradeAction,
    },
    /// USD exchange rate commands
    Rate {
        #[command(subcommand)]
        action: RateAction,
    },
    /// Suggest stop-loss / take-profit and size the position
    Calc {
        /// Entry price
        #[arg(short, long)]
        entry: String,
        /// Capital to invest
        #[arg(short, long, default_value = "10000")]
        capital: String,
        /// Asset symbol
        #[arg(short, long)]
        symbol: String,
    },
    /// Format an amount as money
    Format {
        /// Amount to format
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Parse a locale-formatted amount
    Parse {
        /// Text to parse
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

#[derive(Subcommand)]
enum PortfolioAction {
    /// Show holdings, totals and breakdowns
    Show,
    /// Add a holding
    Add {
        /// Asset type (CEDEAR, Stock, Bond, Fund, Crypto, Note, Bill, Other, Repo, Cash-FX)
        #[arg(short = 't', long)]
        asset_type: AssetType,
        /// Broker name
        #[arg(short, long)]
        broker: String,
        /// Amount invested (e.g. 1.500,50)
        #[arg(short, long)]
        amount: String,
        /// Currency (LOCAL, USD, USDT)
        #[arg(short, long, default_value = "LOCAL")]
        currency: Currency,
        /// Income type (Variable, Fixed, Mixed)
        #[arg(short, long, default_value = "Variable")]
        income: IncomeType,
    },
    /// Remove the holding at a position
    Remove {
        /// Zero-based position in the holdings list
        #[arg(short, long)]
        index: usize,
    },
    /// Replace the whole portfolio with holdings from a JSON file
    Import {
        /// JSON array of holdings
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Remove every holding
    Clear,
}

#[derive(clap::Args)]
struct TradeArgs {
    /// Asset symbol
    #[arg(short, long)]
    symbol: String,
    /// Entry date (YYYY-MM-DD, default today)
    #[arg(long)]
    entry_date: Option<NaiveDate>,
    /// Exit date (YYYY-MM-DD, default today)
    #[arg(long)]
    exit_date: Option<NaiveDate>,
    /// BUY or SELL
    #[arg(long, default_value = "BUY")]
    side: TradeSide,
    /// Units traded
    #[arg(short, long)]
    quantity: String,
    /// Entry price per unit
    #[arg(long)]
    entry_price: String,
    /// Exit price per unit
    #[arg(long)]
    exit_price: String,
    /// Technical, Fundamental or Mixed
    #[arg(long, default_value = "Technical")]
    strategy: TradeStrategy,
    /// Free-text notes
    #[arg(short, long, default_value = "")]
    notes: String,
}

impl TradeArgs {
    fn into_input(self) -> TradeInput {
        let today = Local::now().date_naive();
        TradeInput {
            entry_date: self.entry_date.unwrap_or(today),
            exit_date: self.exit_date.unwrap_or(today),
            symbol: self.symbol,
            side: self.side,
            quantity: currency::parse_or_zero(&self.quantity),
            entry_price: currency::parse_or_zero(&self.entry_price),
            exit_price: currency::parse_or_zero(&self.exit_price),
            strategy: self.strategy,
            notes: self.notes,
        }
    }
}

#[derive(Subcommand)]
enum TradeAction {
    /// Record a completed trade
    Add(TradeArgs),
    /// Compute the metrics of a trade without recording it
    Preview(TradeArgs),
    /// List trades, newest first, with statistics and equity curve
    List,
    /// Delete a trade by id
    Delete {
        /// Trade id
        #[arg(short, long)]
        id: u64,
    },
    /// Trade statistics only
    Stats,
}

#[derive(Subcommand)]
enum RateAction {
    /// Show the current USD rate
    Show,
    /// Record a new USD rate
    Set {
        /// Local currency units per USD
        #[arg(short, long)]
        value: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = Config::default_path();
    let config = Config::load_from_path(&config_path);
    let filter = config
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Ignoring config at {}: {}", config_path.display(), e);
        Config::default()
    });

    let store_path = cli.store.unwrap_or_else(|| config.store_path());
    tracing::debug!("Using store {}", store_path.display());
    let mut app = AppState::with_config(Store::open(store_path), &config);

    let result = match cli.command {
        Commands::Portfolio { action } => handle_portfolio(&mut app, action),
        Commands::Trade { action } => handle_trade(&mut app, action),
        Commands::Rate { action } => handle_rate(&mut app, action),
        Commands::Calc {
            entry,
            capital,
            symbol,
        } => handle_calc(&app, &entry, &capital, &symbol),
        Commands::Format { value } => Ok(handle_format(&value)),
        Commands::Parse { text } => Ok(handle_parse(&text)),
    };

    let (response, code) = match result {
        Ok(data) => (ApiResponse::ok(data), ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{}", e);
            (ApiResponse::<Value>::err(e.to_string()), ExitCode::FAILURE)
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(code)
}

fn handle_portfolio(app: &mut AppState, action: PortfolioAction) -> Result<Value> {
    match action {
        PortfolioAction::Show => Ok(serde_json::to_value(app.portfolio_view())?),
        PortfolioAction::Add {
            asset_type,
            broker,
            amount,
            currency: denomination,
            income,
        } => {
            let holding = Holding::new(
                asset_type,
                &broker,
                currency::parse_or_zero(&amount),
                denomination,
                income,
            );
            app.add_holding(holding.clone())?;
            Ok(json!({
                "holding": holding,
                "holding_count": app.holdings().len(),
            }))
        }
        PortfolioAction::Remove { index } => {
            let removed = app.remove_holding(index)?;
            Ok(json!({
                "removed": removed,
                "holding_count": app.holdings().len(),
            }))
        }
        PortfolioAction::Import { file } => {
            let content = fs::read_to_string(&file)?;
            let holdings: Vec<Holding> = serde_json::from_str(&content)?;
            app.save_portfolio(holdings)?;
            Ok(json!({
                "message": "Portfolio saved",
                "holding_count": app.holdings().len(),
            }))
        }
        PortfolioAction::Clear => {
            app.clear_portfolio()?;
            Ok(json!({ "message": "Portfolio cleared" }))
        }
    }
}

fn handle_trade(app: &mut AppState, action: TradeAction) -> Result<Value> {
    match action {
        TradeAction::Add(args) => {
            let trade = app.record_trade(args.into_input())?;
            Ok(json!({
                "trade": trade,
                "formatted": {
                    "investment_total": currency::format(trade.metrics.investment_total),
                    "result": currency::format(trade.metrics.result),
                    "roi": format!("{:.1}%", trade.metrics.roi_pct),
                },
            }))
        }
        TradeAction::Preview(args) => {
            let input = args.into_input();
            let metrics = input.preview();
            let problem = input.validate().err().map(|e| e.to_string());
            Ok(json!({
                "metrics": metrics,
                "valid": problem.is_none(),
                "problem": problem,
            }))
        }
        TradeAction::List => Ok(serde_json::to_value(app.trade_log_view())?),
        TradeAction::Delete { id } => {
            let removed = app.delete_trade(TradeId(id))?;
            Ok(json!({ "removed": removed }))
        }
        TradeAction::Stats => Ok(serde_json::to_value(app.trade_log_view().stats)?),
    }
}

fn handle_rate(app: &mut AppState, action: RateAction) -> Result<Value> {
    match action {
        RateAction::Show => Ok(json!({
            "rate": app.current_rate(),
            "formatted": currency::format(app.current_rate()),
            "sample": app.latest_rate_sample(),
        })),
        RateAction::Set { value } => {
            let sample = app.update_rate(currency::parse_or_zero(&value))?;
            Ok(json!({ "sample": sample }))
        }
    }
}

fn handle_calc(app: &AppState, entry: &str, capital: &str, symbol: &str) -> Result<Value> {
    let entry_price = currency::parse_or_zero(entry);
    let capital = currency::parse_or_zero(capital);

    match app.calculator_view(capital, entry_price, symbol) {
        Some(view) => Ok(serde_json::to_value(view)?),
        None => Ok(json!({
            "message": "Enter a positive entry price and a symbol",
            "stop_loss": 0.0,
            "take_profit": 0.0,
        })),
    }
}

fn handle_format(value: &str) -> Value {
    json!({
        "input": value,
        "formatted": currency::format_text(value),
    })
}

fn handle_parse(text: &str) -> Value {
    match currency::parse(text) {
        Ok(value) => json!({ "input": text, "value": value, "parsed": true }),
        Err(failure) => json!({
            "input": text,
            "value": 0.0,
            "parsed": false,
            "reason": failure.to_string(),
        }),
    }
}
