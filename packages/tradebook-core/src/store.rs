//! Single-writer JSON store for holdings, trades and exchange rate samples.
//!
//! Every mutating call reads the document, applies the change and writes it
//! back before returning. Writes go to a sibling temp file that is renamed
//! over the store, so a failed write leaves the previous document intact.
//! Concurrent access from several processes is not supported.

use crate::config::Config;
use crate::types::{ExchangeRateSample, Holding, Trade, TradeDraft, TradeId};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk layout: three logical tables plus the id counter.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreDocument {
    /// Portfolio holdings, replaced as a whole on save
    #[serde(default)]
    pub holdings: Vec<Holding>,
    /// Trade log, append-only plus delete by id
    #[serde(default)]
    pub trades: Vec<Trade>,
    /// USD rate history, append-only
    #[serde(default)]
    pub rate_samples: Vec<ExchangeRateSample>,
    /// Next trade id to hand out; ids are never reused
    #[serde(default)]
    pub next_trade_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoreDocument {
    /// Most recent rate sample, if any. Ties go to the later-appended sample.
    pub fn latest_rate(&self) -> Option<&ExchangeRateSample> {
        self.rate_samples
            .iter()
            .fold(None, |best: Option<&ExchangeRateSample>, s| match best {
                Some(b) if b.timestamp > s.timestamp => Some(b),
                _ => Some(s),
            })
    }

    /// Effective USD rate, or `default` when no sample exists.
    pub fn current_rate(&self, default: f64) -> f64 {
        self.latest_rate()
            .map(|s| s.usd_to_local_rate)
            .unwrap_or(default)
    }

    fn allocate_trade_id(&mut self) -> TradeId {
        let floor = self
            .trades
            .iter()
            .map(|t| t.id.0 + 1)
            .max()
            .unwrap_or(1);
        let id = self.next_trade_id.max(floor);
        self.next_trade_id = id + 1;
        TradeId(id)
    }
}

#[derive(Debug)]
enum Backing {
    File(PathBuf),
    Memory(StoreDocument),
}

/// Handle to the persisted store.
#[derive(Debug)]
pub struct Store {
    backing: Backing,
}

impl Store {
    /// Open a file-backed store. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::File(path.into()),
        }
    }

    /// Open the store at the configured default location.
    ///
    /// `TRADEBOOK_STORE_FILE` overrides the config file, which overrides
    /// `<data_dir>/tradebook/store.json`.
    pub fn open_default() -> Self {
        Self::open(Config::load().store_path())
    }

    /// Create an in-memory store (no persistence).
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(StoreDocument::default()),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    /// Read the whole document.
    pub fn load(&self) -> Result<StoreDocument> {
        match &self.backing {
            Backing::File(path) => load_from_path(path),
            Backing::Memory(doc) => Ok(doc.clone()),
        }
    }

    /// Replace every holding with `holdings` (last write wins).
    pub fn replace_holdings(&mut self, holdings: &[Holding]) -> Result<()> {
        self.mutate(|doc| {
            doc.holdings = holdings.to_vec();
            Ok(())
        })?;
        tracing::debug!("Stored {} holdings", holdings.len());
        Ok(())
    }

    /// Append a trade, assigning it the next id.
    pub fn append_trade(&mut self, draft: TradeDraft) -> Result<Trade> {
        let trade = self.mutate(|doc| {
            let id = doc.allocate_trade_id();
            let trade = Trade::from_draft(id, draft);
            doc.trades.push(trade.clone());
            Ok(trade)
        })?;
        tracing::debug!("Stored trade {} ({})", trade.id, trade.symbol);
        Ok(trade)
    }

    /// Delete exactly one trade by id. The remaining trades keep their order.
    pub fn delete_trade(&mut self, id: TradeId) -> Result<Trade> {
        let removed = self.mutate(|doc| {
            let idx = doc
                .trades
                .iter()
                .position(|t| t.id == id)
                .ok_or(Error::TradeNotFound(id))?;
            Ok(doc.trades.remove(idx))
        })?;
        tracing::debug!("Deleted trade {}", id);
        Ok(removed)
    }

    /// Append an exchange rate sample.
    pub fn append_rate(&mut self, sample: ExchangeRateSample) -> Result<()> {
        self.mutate(|doc| {
            doc.rate_samples.push(sample);
            Ok(())
        })?;
        tracing::debug!("Stored rate sample {}", sample.usd_to_local_rate);
        Ok(())
    }

    /// Load, apply `f`, write back. Nothing is written if loading or `f` fails.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let mut doc = self.load()?;
        let out = f(&mut doc)?;

        let now = Utc::now();
        if doc.created_at.is_none() {
            doc.created_at = Some(now);
        }
        doc.updated_at = Some(now);

        // Non-finite floats serialize as `null` and would not load back
        let content = serde_json::to_string_pretty(&doc)?;
        serde_json::from_str::<StoreDocument>(&content)?;

        match &mut self.backing {
            Backing::File(path) => save_to_path(path, &content)?,
            Backing::Memory(memory) => *memory = doc,
        }
        Ok(out)
    }
}

fn load_from_path(path: &Path) -> Result<StoreDocument> {
    if !path.exists() {
        return Ok(StoreDocument::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(StoreDocument::default());
    }

    serde_json::from_str(&content).map_err(|source| Error::StoreCorrupted {
        path: path.to_path_buf(),
        source,
    })
}

fn save_to_path(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
