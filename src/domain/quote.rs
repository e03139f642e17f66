//! Quotes, feed ticks and last-digit derivation.
//!
//! The last digit of a quote is the digit in the smallest decimal place of
//! its formatted representation. Formatting is either the shortest
//! representation that round-trips the value, or a fixed number of decimals
//! (the feed's pip size). Either way equal values always yield equal digits.

use chrono::{DateTime, Utc};
use std::fmt;

/// Largest pip size accepted for fixed formatting.
pub const MAX_PIP_DECIMALS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigitFormat {
    /// Shortest round-trip representation; trailing zeros are not significant.
    #[default]
    Shortest,
    /// Fixed number of decimals.
    Fixed(u32),
}

impl fmt::Display for DigitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitFormat::Shortest => write!(f, "shortest"),
            DigitFormat::Fixed(decimals) => write!(f, "fixed({})", decimals),
        }
    }
}

/// A quote recorded in a window.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Arrival order within its window, starting at 0.
    pub sequence: u64,
    pub price: f64,
    pub epoch: Option<DateTime<Utc>>,
}

/// A tick as delivered by a feed, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub symbol: String,
    pub epoch: Option<DateTime<Utc>>,
    pub quote: String,
}

impl Tick {
    pub fn new(symbol: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            epoch: None,
            quote: quote.into(),
        }
    }

    pub fn with_epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// The quote as a finite price, if it is one.
    pub fn price(&self) -> Option<f64> {
        parse_price(&self.quote)
    }
}

/// Parse feed text into a finite price.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Last digit of `price` under `format`. `None` for non-finite prices.
pub fn last_digit(price: f64, format: DigitFormat) -> Option<u8> {
    if !price.is_finite() {
        return None;
    }
    let magnitude = price.abs();
    let text = match format {
        DigitFormat::Shortest => magnitude.to_string(),
        DigitFormat::Fixed(decimals) => format!("{:.*}", decimals as usize, magnitude),
    };
    text.bytes()
        .next_back()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
}
