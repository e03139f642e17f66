#![allow(dead_code)]

use chrono::{DateTime, Utc};
use tickdigits::domain::error::TickError;
use tickdigits::domain::quote::Tick;
use tickdigits::domain::window::{DigitWindow, WindowConfig};
use tickdigits::ports::tick_port::TickPort;
use std::collections::HashMap;

pub struct MockTickPort {
    pub ticks: HashMap<String, Vec<Tick>>,
    pub errors: HashMap<String, String>,
}

impl MockTickPort {
    pub fn new() -> Self {
        Self {
            ticks: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quotes(mut self, symbol: &str, quotes: &[&str]) -> Self {
        let ticks = quotes.iter().map(|q| Tick::new(symbol, *q)).collect();
        self.ticks.insert(symbol.to_string(), ticks);
        self
    }

    pub fn with_prices(self, symbol: &str, prices: &[f64]) -> Self {
        let quotes: Vec<String> = prices.iter().map(|p| p.to_string()).collect();
        let refs: Vec<&str> = quotes.iter().map(String::as_str).collect();
        self.with_quotes(symbol, &refs)
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl TickPort for MockTickPort {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<Tick>, TickError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickError::TickData {
                reason: reason.clone(),
            });
        }
        Ok(self.ticks.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickError> {
        let mut symbols: Vec<String> = self.ticks.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Prices whose shortest rendering ends in each digit of `digits`, in order.
pub fn prices_ending_in(digits: &[u8]) -> Vec<f64> {
    digits
        .iter()
        .enumerate()
        .map(|(i, &d)| ((100 + i as u64) * 100 + u64::from(d)) as f64 / 100.0)
        .collect()
}

pub fn window_from_prices(prices: &[f64], capacity: usize) -> DigitWindow {
    let mut window = DigitWindow::new("R_100", WindowConfig::new(capacity).unwrap());
    for &p in prices {
        window.append(p).unwrap();
    }
    window
}

pub fn make_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}
