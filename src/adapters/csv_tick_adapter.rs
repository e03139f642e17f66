//! CSV tick file adapter.
//!
//! Expects a header row `symbol,epoch,quote`. `epoch` is unix seconds and
//! may be empty. Quote text is passed through untouched so malformed quotes
//! reach the window and are counted there.

use crate::domain::error::TickError;
use crate::domain::quote::Tick;
use crate::ports::tick_port::TickPort;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

pub struct CsvTickAdapter {
    path: PathBuf,
}

impl CsvTickAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<Vec<Tick>, TickError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TickError::TickData {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut ticks = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TickError::TickData {
                reason: format!("CSV parse error: {}", e),
            })?;

            let symbol = record
                .get(0)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| TickError::TickData {
                    reason: format!("missing symbol on record {}", line + 1),
                })?;
            let epoch = parse_epoch(record.get(1).unwrap_or(""), line + 1)?;
            let quote = record.get(2).ok_or_else(|| TickError::TickData {
                reason: format!("missing quote column on record {}", line + 1),
            })?;

            ticks.push(Tick {
                symbol: symbol.to_string(),
                epoch,
                quote: quote.to_string(),
            });
        }

        Ok(ticks)
    }
}

fn parse_epoch(raw: &str, record: usize) -> Result<Option<DateTime<Utc>>, TickError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let invalid = || TickError::TickData {
        reason: format!("invalid epoch {:?} on record {}", raw, record),
    };
    let secs: i64 = raw.parse().map_err(|_| invalid())?;
    DateTime::from_timestamp(secs, 0).map(Some).ok_or_else(invalid)
}

impl TickPort for CsvTickAdapter {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<Tick>, TickError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|t| t.symbol == symbol)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickError> {
        let symbols: BTreeSet<String> = self.read_all()?.into_iter().map(|t| t.symbol).collect();
        Ok(symbols.into_iter().collect())
    }

    fn tick_counts(&self) -> Result<Vec<(String, usize)>, TickError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for tick in self.read_all()? {
            *counts.entry(tick.symbol).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
