//! Bounded per-symbol digit window.
//!
//! Holds the most recent quotes for one symbol in arrival order and answers
//! digit queries over a trailing slice of them.
//!
//! # Query policy
//!
//! - `count == 0` is always `InvalidArgument`.
//! - `last_digits` and `frequency_rank` fail with `InsufficientHistory` when
//!   the window is empty or shorter than `count`.
//! - Boolean queries (`check_pattern`, `compare_digits`) return `false` on an
//!   empty window; proportions (`even_odd_percentage`, `digit_distribution`)
//!   return zero. A non-empty window shorter than `count` is still
//!   `InsufficientHistory`.
//! - `trend_percentage` reads at most `count` trailing prices and never fails
//!   on short history.

use crate::domain::analysis::{
    self, ComparisonOperator, FrequencyRank, Parity, Pattern, Trend,
};
use crate::domain::error::TickError;
use crate::domain::quote::{last_digit, parse_price, DigitFormat, Quote, Tick};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    capacity: usize,
    digit_format: DigitFormat,
}

impl WindowConfig {
    pub fn new(capacity: usize) -> Result<Self, TickError> {
        if capacity == 0 {
            return Err(TickError::invalid("window capacity must be at least 1"));
        }
        Ok(Self {
            capacity,
            digit_format: DigitFormat::Shortest,
        })
    }

    pub fn with_digit_format(mut self, digit_format: DigitFormat) -> Self {
        self.digit_format = digit_format;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn digit_format(&self) -> DigitFormat {
        self.digit_format
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            digit_format: DigitFormat::Shortest,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DigitWindow {
    symbol: String,
    config: WindowConfig,
    quotes: VecDeque<Quote>,
    next_sequence: u64,
    rejected: u64,
    last_rejection: Option<String>,
}

impl DigitWindow {
    pub fn new(symbol: impl Into<String>, config: WindowConfig) -> Self {
        Self {
            symbol: symbol.into(),
            config,
            quotes: VecDeque::with_capacity(config.capacity + 1),
            next_sequence: 0,
            rejected: 0,
            last_rejection: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.quotes.len() == self.config.capacity
    }

    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }

    pub fn latest(&self) -> Option<&Quote> {
        self.quotes.back()
    }

    /// Number of quotes rejected as malformed since creation.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Raw text of the most recently rejected quote.
    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }

    pub fn clear(&mut self) {
        self.quotes.clear();
    }

    /// Append a price, evicting the oldest quotes beyond capacity.
    ///
    /// Non-finite prices are rejected and leave the window untouched.
    pub fn append(&mut self, price: f64) -> Result<(), TickError> {
        self.record(price, None)
    }

    /// Append feed text; anything that is not a finite number is rejected.
    pub fn append_raw(&mut self, raw: &str) -> Result<(), TickError> {
        match parse_price(raw) {
            Some(price) => self.record(price, None),
            None => Err(self.reject(raw.to_string())),
        }
    }

    pub fn append_tick(&mut self, tick: &Tick) -> Result<(), TickError> {
        match tick.price() {
            Some(price) => self.record(price, tick.epoch),
            None => Err(self.reject(tick.quote.clone())),
        }
    }

    /// Replace the contents with a history snapshot, keeping the trailing
    /// `capacity` well-formed prices. Returns how many were rejected.
    pub fn seed<I>(&mut self, prices: I) -> usize
    where
        I: IntoIterator<Item = f64>,
    {
        self.quotes.clear();
        let rejected = prices
            .into_iter()
            .filter(|&price| self.append(price).is_err())
            .count();
        debug!(symbol = %self.symbol, kept = self.quotes.len(), rejected, "seeded window");
        rejected
    }

    fn record(&mut self, price: f64, epoch: Option<DateTime<Utc>>) -> Result<(), TickError> {
        if !price.is_finite() {
            return Err(self.reject(price.to_string()));
        }
        self.quotes.push_back(Quote {
            sequence: self.next_sequence,
            price,
            epoch,
        });
        self.next_sequence += 1;
        while self.quotes.len() > self.config.capacity {
            self.quotes.pop_front();
        }
        Ok(())
    }

    fn reject(&mut self, raw: String) -> TickError {
        warn!(symbol = %self.symbol, raw = %raw, "dropping malformed quote");
        self.rejected += 1;
        self.last_rejection = Some(raw.clone());
        TickError::MalformedQuote {
            symbol: self.symbol.clone(),
            raw,
        }
    }

    /// Last digits of the `count` most recent quotes, oldest first.
    pub fn last_digits(&self, count: usize) -> Result<Vec<u8>, TickError> {
        if count == 0 {
            return Err(TickError::invalid("count must be at least 1"));
        }
        if count > self.quotes.len() {
            return Err(TickError::InsufficientHistory {
                requested: count,
                available: self.quotes.len(),
            });
        }
        let format = self.config.digit_format;
        Ok(self
            .quotes
            .range(self.quotes.len() - count..)
            .filter_map(|q| last_digit(q.price, format))
            .collect())
    }

    /// Like `last_digits`, but an empty window yields an empty slice.
    fn digits_or_empty(&self, count: usize) -> Result<Vec<u8>, TickError> {
        if count > 0 && self.quotes.is_empty() {
            return Ok(Vec::new());
        }
        self.last_digits(count)
    }

    pub fn check_pattern(&self, count: usize, pattern: Pattern) -> Result<bool, TickError> {
        let digits = self.digits_or_empty(count)?;
        Ok(analysis::check_pattern(&digits, pattern))
    }

    pub fn compare_digits(
        &self,
        count: usize,
        operator: ComparisonOperator,
        target: u8,
    ) -> Result<bool, TickError> {
        if target > 9 {
            return Err(TickError::invalid(format!(
                "target digit must be 0-9, got {target}"
            )));
        }
        let digits = self.digits_or_empty(count)?;
        Ok(analysis::compare_digits(&digits, operator, target))
    }

    pub fn frequency_rank(&self, count: usize, rank: FrequencyRank) -> Result<u8, TickError> {
        let digits = self.last_digits(count)?;
        analysis::frequency_rank(&digits, rank).ok_or(TickError::InsufficientHistory {
            requested: count,
            available: self.quotes.len(),
        })
    }

    pub fn even_odd_percentage(&self, parity: Parity, count: usize) -> Result<f64, TickError> {
        let digits = self.digits_or_empty(count)?;
        Ok(analysis::parity_percentage(&digits, parity))
    }

    pub fn digit_distribution(&self, count: usize) -> Result<[f64; 10], TickError> {
        let digits = self.digits_or_empty(count)?;
        Ok(analysis::digit_distribution(&digits))
    }

    pub fn trend_percentage(&self, count: usize) -> Result<Trend, TickError> {
        if count == 0 {
            return Err(TickError::invalid("count must be at least 1"));
        }
        let start = self.quotes.len().saturating_sub(count);
        let prices: Vec<f64> = self.quotes.range(start..).map(|q| q.price).collect();
        Ok(analysis::trend_percentage(&prices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn window_with(prices: &[f64]) -> DigitWindow {
        let mut w = DigitWindow::new("R_100", WindowConfig::default());
        for &p in prices {
            w.append(p).unwrap();
        }
        w
    }

    fn empty() -> DigitWindow {
        DigitWindow::new("R_100", WindowConfig::default())
    }

    #[test]
    fn zero_capacity_config_rejected() {
        assert!(matches!(
            WindowConfig::new(0),
            Err(TickError::InvalidArgument { .. })
        ));
        assert_eq!(WindowConfig::new(3).unwrap().capacity(), 3);
        assert_eq!(WindowConfig::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn append_assigns_arrival_sequence() {
        let w = window_with(&[1.1, 1.2, 1.3]);
        let seqs: Vec<u64> = w.quotes().map(|q| q.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(w.latest().unwrap().price, 1.3);
    }

    #[test]
    fn eviction_drops_oldest() {
        let mut w = DigitWindow::new("R_10", WindowConfig::new(3).unwrap());
        for p in [10.1, 10.2, 10.3, 10.4] {
            w.append(p).unwrap();
        }
        assert_eq!(w.len(), 3);
        assert!(w.is_full());
        assert_eq!(w.last_digits(3).unwrap(), vec![2, 3, 4]);
        assert_eq!(w.quotes().next().unwrap().sequence, 1);
    }

    #[test]
    fn malformed_quotes_are_dropped_and_counted() {
        let mut w = window_with(&[1.25]);
        assert!(matches!(
            w.append(f64::NAN),
            Err(TickError::MalformedQuote { .. })
        ));
        assert!(w.append(f64::NEG_INFINITY).is_err());
        assert!(w.append_raw("12.x").is_err());
        assert_eq!(w.len(), 1);
        assert_eq!(w.rejected(), 3);
        assert_eq!(w.last_rejection(), Some("12.x"));
        assert_eq!(w.last_digits(1).unwrap(), vec![5]);
    }

    #[test]
    fn append_tick_keeps_epoch() {
        let epoch = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut w = empty();
        w.append_tick(&Tick::new("R_100", "987.65").with_epoch(epoch))
            .unwrap();
        assert_eq!(w.latest().unwrap().epoch, Some(epoch));
        assert!(w.append_tick(&Tick::new("R_100", "")).is_err());
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn last_digits_oldest_first() {
        let w = window_with(&[123.45, 124.62, 125.73]);
        assert_eq!(w.last_digits(3).unwrap(), vec![5, 2, 3]);
        assert_eq!(w.last_digits(2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn last_digits_argument_errors() {
        let w = window_with(&[1.1, 1.2]);
        assert!(matches!(
            w.last_digits(0),
            Err(TickError::InvalidArgument { .. })
        ));
        assert!(matches!(
            w.last_digits(3),
            Err(TickError::InsufficientHistory {
                requested: 3,
                available: 2
            })
        ));
        assert!(matches!(
            empty().last_digits(1),
            Err(TickError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn fixed_digit_format_counts_pip_zeros() {
        let config = WindowConfig::default().with_digit_format(DigitFormat::Fixed(2));
        let mut w = DigitWindow::new("R_50", config);
        w.append(123.40).unwrap();
        w.append(123.41).unwrap();
        assert_eq!(w.last_digits(2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn check_pattern_all_same() {
        let w = window_with(&[1.05, 2.15, 3.25]);
        assert!(w.check_pattern(3, Pattern::AllSame).unwrap());
        let w = window_with(&[1.05, 2.15, 3.26]);
        assert!(!w.check_pattern(3, Pattern::AllSame).unwrap());
    }

    #[test]
    fn check_pattern_uses_trailing_slice() {
        let w = window_with(&[1.01, 1.02, 1.04, 1.06]);
        assert!(!w.check_pattern(4, Pattern::AllEven).unwrap());
        assert!(w.check_pattern(3, Pattern::AllEven).unwrap());
    }

    #[test]
    fn compare_digits_greater() {
        let w = window_with(&[1.15, 1.16, 1.17]);
        assert!(w.compare_digits(3, ComparisonOperator::Greater, 4).unwrap());
        let w = window_with(&[1.15, 1.16, 1.13]);
        assert!(!w.compare_digits(3, ComparisonOperator::Greater, 4).unwrap());
    }

    #[test]
    fn compare_digits_rejects_bad_target() {
        let w = window_with(&[1.15]);
        assert!(matches!(
            w.compare_digits(1, ComparisonOperator::Equal, 10),
            Err(TickError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn empty_window_fallbacks() {
        let w = empty();
        assert!(!w.check_pattern(5, Pattern::AllEven).unwrap());
        assert!(!w.check_pattern(5, Pattern::AllSame).unwrap());
        assert!(!w.compare_digits(3, ComparisonOperator::LessEqual, 9).unwrap());
        assert_eq!(w.even_odd_percentage(Parity::Even, 10).unwrap(), 0.0);
        assert_eq!(w.digit_distribution(10).unwrap(), [0.0; 10]);
        assert_eq!(w.trend_percentage(10).unwrap(), Trend::default());
        assert!(matches!(
            w.frequency_rank(5, FrequencyRank::Most),
            Err(TickError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn zero_count_is_invalid_everywhere() {
        let w = window_with(&[1.1, 1.2]);
        assert!(w.check_pattern(0, Pattern::AllOdd).is_err());
        assert!(w.compare_digits(0, ComparisonOperator::Equal, 1).is_err());
        assert!(w.frequency_rank(0, FrequencyRank::Most).is_err());
        assert!(w.even_odd_percentage(Parity::Odd, 0).is_err());
        assert!(w.trend_percentage(0).is_err());
        assert!(empty().check_pattern(0, Pattern::AllOdd).is_err());
        assert!(empty().even_odd_percentage(Parity::Odd, 0).is_err());
    }

    #[test]
    fn short_history_propagates_for_non_empty_window() {
        let w = window_with(&[1.1, 1.2]);
        assert!(matches!(
            w.check_pattern(5, Pattern::AllEven),
            Err(TickError::InsufficientHistory { .. })
        ));
        assert!(matches!(
            w.even_odd_percentage(Parity::Even, 5),
            Err(TickError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn frequency_rank_tie_break() {
        let w = window_with(&[1.13, 1.23, 1.17, 1.27]);
        assert_eq!(w.frequency_rank(4, FrequencyRank::Most).unwrap(), 3);
        assert_eq!(w.frequency_rank(4, FrequencyRank::Least).unwrap(), 7);
    }

    #[test]
    fn even_odd_from_quotes() {
        let w = window_with(&[
            123.40, 124.51, 125.62, 126.73, 127.84, 128.95, 129.06, 130.17, 131.28, 132.39,
        ]);
        // 123.40 formats as 123.4, so the first digit is 4 (even).
        assert_abs_diff_eq!(w.even_odd_percentage(Parity::Even, 10).unwrap(), 50.0);
        assert_abs_diff_eq!(w.even_odd_percentage(Parity::Odd, 10).unwrap(), 50.0);
    }

    #[test]
    fn trend_clamps_to_window() {
        let w = window_with(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let t = w.trend_percentage(50).unwrap();
        assert_abs_diff_eq!(t.rise_percentage, 100.0);
        let w = window_with(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_abs_diff_eq!(w.trend_percentage(5).unwrap().fall_percentage, 100.0);
        let w = window_with(&[1.0, 1.0, 1.0]);
        assert_eq!(w.trend_percentage(3).unwrap(), Trend::default());
    }

    #[test]
    fn trend_only_reads_trailing_prices() {
        let w = window_with(&[9.0, 1.0, 2.0, 3.0]);
        let t = w.trend_percentage(3).unwrap();
        assert_abs_diff_eq!(t.rise_percentage, 100.0);
        assert_abs_diff_eq!(t.fall_percentage, 0.0);
    }

    #[test]
    fn seed_keeps_trailing_capacity_and_counts_rejects() {
        let mut w = DigitWindow::new("R_25", WindowConfig::new(3).unwrap());
        w.append(99.9).unwrap();
        let rejected = w.seed([1.1, f64::NAN, 1.2, 1.3, 1.4]);
        assert_eq!(rejected, 1);
        assert_eq!(w.last_digits(3).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn clear_empties_window() {
        let mut w = window_with(&[1.1, 1.2]);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.symbol(), "R_100");
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(
            capacity in 1usize..40,
            prices in prop::collection::vec(0.0f64..10_000.0, 0..200),
        ) {
            let mut w = DigitWindow::new("P", WindowConfig::new(capacity).unwrap());
            for p in prices {
                w.append(p).unwrap();
                prop_assert!(w.len() <= capacity);
            }
        }

        #[test]
        fn parity_percentages_sum_to_hundred(
            prices in prop::collection::vec(0.0f64..10_000.0, 1..120),
        ) {
            let w = {
                let mut w = DigitWindow::new("P", WindowConfig::default());
                for &p in &prices {
                    w.append(p).unwrap();
                }
                w
            };
            let n = w.len();
            let even = w.even_odd_percentage(Parity::Even, n).unwrap();
            let odd = w.even_odd_percentage(Parity::Odd, n).unwrap();
            prop_assert_eq!(even + odd, 100.0);
        }

        #[test]
        fn frequency_rank_is_idempotent(
            prices in prop::collection::vec(0.0f64..1_000.0, 1..60),
        ) {
            let mut w = DigitWindow::new("P", WindowConfig::default());
            for &p in &prices {
                w.append(p).unwrap();
            }
            let n = w.len();
            let most = w.frequency_rank(n, FrequencyRank::Most).unwrap();
            let least = w.frequency_rank(n, FrequencyRank::Least).unwrap();
            prop_assert_eq!(w.frequency_rank(n, FrequencyRank::Most).unwrap(), most);
            prop_assert_eq!(w.frequency_rank(n, FrequencyRank::Least).unwrap(), least);
        }

        #[test]
        fn trend_is_complementary(
            prices in prop::collection::vec(0.0f64..100.0, 2..80),
        ) {
            let mut w = DigitWindow::new("P", WindowConfig::default());
            for &p in &prices {
                w.append(p).unwrap();
            }
            let t = w.trend_percentage(prices.len()).unwrap();
            let sum = t.rise_percentage + t.fall_percentage;
            prop_assert!(sum == 0.0 || (sum - 100.0).abs() < 1e-9);
        }
    }
}
