//! Recorded tick source port trait.

use crate::domain::error::TickError;
use crate::domain::quote::Tick;

pub trait TickPort {
    /// Ticks for `symbol` in arrival order. Quote text is not validated here;
    /// the window rejects malformed quotes on append.
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<Tick>, TickError>;

    fn list_symbols(&self) -> Result<Vec<String>, TickError>;

    /// `(symbol, tick count)` pairs sorted by symbol. Sources that can count
    /// in one pass should override this.
    fn tick_counts(&self) -> Result<Vec<(String, usize)>, TickError> {
        self.list_symbols()?
            .into_iter()
            .map(|symbol| {
                let count = self.fetch_ticks(&symbol)?.len();
                Ok((symbol, count))
            })
            .collect()
    }
}
