//! Per-symbol window registry.
//!
//! `TickRegistry` is the single-threaded entry point for a transport layer:
//! windows are created on subscribe (or first append) and destroyed on
//! unsubscribe. `SharedTickRegistry` is the same thing for multi-threaded
//! hosts, with one lock per symbol so writers to one symbol never block
//! queries on another.

use crate::domain::error::TickError;
use crate::domain::quote::Tick;
use crate::domain::window::{DigitWindow, WindowConfig};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TickRegistry {
    default_config: WindowConfig,
    overrides: HashMap<String, WindowConfig>,
    windows: HashMap<String, DigitWindow>,
}

impl TickRegistry {
    pub fn new(default_config: WindowConfig) -> Self {
        Self {
            default_config,
            overrides: HashMap::new(),
            windows: HashMap::new(),
        }
    }

    /// Override the window configuration for one symbol. Applies to windows
    /// created after the call.
    pub fn with_symbol_config(mut self, symbol: impl Into<String>, config: WindowConfig) -> Self {
        self.overrides.insert(symbol.into(), config);
        self
    }

    pub fn config_for(&self, symbol: &str) -> WindowConfig {
        self.overrides
            .get(symbol)
            .copied()
            .unwrap_or(self.default_config)
    }

    /// Create the window for `symbol` if it does not exist yet.
    pub fn subscribe(&mut self, symbol: &str) -> &mut DigitWindow {
        let config = self.config_for(symbol);
        self.windows.entry(symbol.to_string()).or_insert_with(|| {
            debug!(symbol, capacity = config.capacity(), "subscribed");
            DigitWindow::new(symbol, config)
        })
    }

    /// Destroy the window for `symbol`. Returns whether it existed.
    pub fn unsubscribe(&mut self, symbol: &str) -> bool {
        let existed = self.windows.remove(symbol).is_some();
        if existed {
            debug!(symbol, "unsubscribed");
        }
        existed
    }

    pub fn append(&mut self, symbol: &str, price: f64) -> Result<(), TickError> {
        self.subscribe(symbol).append(price)
    }

    pub fn append_tick(&mut self, tick: &Tick) -> Result<(), TickError> {
        self.subscribe(&tick.symbol).append_tick(tick)
    }

    /// Replace the history of `symbol` with a snapshot. Returns how many
    /// prices were rejected.
    pub fn seed<I>(&mut self, symbol: &str, prices: I) -> usize
    where
        I: IntoIterator<Item = f64>,
    {
        self.subscribe(symbol).seed(prices)
    }

    pub fn window(&self, symbol: &str) -> Option<&DigitWindow> {
        self.windows.get(symbol)
    }

    /// Like `window`, but an unknown symbol is an error.
    pub fn get(&self, symbol: &str) -> Result<&DigitWindow, TickError> {
        self.windows
            .get(symbol)
            .ok_or_else(|| TickError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.windows.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn into_shared(self) -> SharedTickRegistry {
        let windows = self
            .windows
            .into_iter()
            .map(|(symbol, window)| (symbol, Arc::new(RwLock::new(window))))
            .collect();
        SharedTickRegistry {
            default_config: self.default_config,
            overrides: Arc::new(self.overrides),
            windows: Arc::new(RwLock::new(windows)),
        }
    }
}

type WindowHandle = Arc<RwLock<DigitWindow>>;

/// Thread-safe registry. Cloning shares the underlying windows.
#[derive(Debug, Clone, Default)]
pub struct SharedTickRegistry {
    default_config: WindowConfig,
    overrides: Arc<HashMap<String, WindowConfig>>,
    windows: Arc<RwLock<HashMap<String, WindowHandle>>>,
}

impl SharedTickRegistry {
    pub fn new(default_config: WindowConfig) -> Self {
        TickRegistry::new(default_config).into_shared()
    }

    fn handle(&self, symbol: &str) -> Option<WindowHandle> {
        self.windows.read().get(symbol).cloned()
    }

    fn handle_or_create(&self, symbol: &str) -> WindowHandle {
        if let Some(handle) = self.handle(symbol) {
            return handle;
        }
        let config = self
            .overrides
            .get(symbol)
            .copied()
            .unwrap_or(self.default_config);
        self.windows
            .write()
            .entry(symbol.to_string())
            .or_insert_with(|| {
                debug!(symbol, capacity = config.capacity(), "subscribed");
                Arc::new(RwLock::new(DigitWindow::new(symbol, config)))
            })
            .clone()
    }

    pub fn subscribe(&self, symbol: &str) {
        self.handle_or_create(symbol);
    }

    pub fn unsubscribe(&self, symbol: &str) -> bool {
        let existed = self.windows.write().remove(symbol).is_some();
        if existed {
            debug!(symbol, "unsubscribed");
        }
        existed
    }

    pub fn append(&self, symbol: &str, price: f64) -> Result<(), TickError> {
        self.handle_or_create(symbol).write().append(price)
    }

    pub fn append_tick(&self, tick: &Tick) -> Result<(), TickError> {
        self.handle_or_create(&tick.symbol).write().append_tick(tick)
    }

    pub fn seed<I>(&self, symbol: &str, prices: I) -> usize
    where
        I: IntoIterator<Item = f64>,
    {
        self.handle_or_create(symbol).write().seed(prices)
    }

    /// Run `query` against a consistent snapshot of the symbol's window.
    pub fn read<R>(
        &self,
        symbol: &str,
        query: impl FnOnce(&DigitWindow) -> R,
    ) -> Result<R, TickError> {
        let handle = self.handle(symbol).ok_or_else(|| TickError::UnknownSymbol {
            symbol: symbol.to_string(),
        })?;
        let window = handle.read();
        Ok(query(&*window))
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.windows.read().keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{FrequencyRank, Parity};
    use crate::domain::quote::DigitFormat;
    use std::thread;

    #[test]
    fn append_creates_window_on_first_use() {
        let mut registry = TickRegistry::default();
        registry.append("R_100", 123.45).unwrap();
        registry.append("R_100", 123.46).unwrap();
        registry.append("R_10", 5.5).unwrap();
        assert_eq!(registry.symbols(), vec!["R_10", "R_100"]);
        assert_eq!(registry.window("R_100").unwrap().len(), 2);
    }

    #[test]
    fn symbols_are_independent() {
        let mut registry = TickRegistry::default();
        registry.append("R_10", 1.11).unwrap();
        registry.append("R_25", 2.22).unwrap();
        assert_eq!(registry.get("R_10").unwrap().last_digits(1).unwrap(), vec![1]);
        assert_eq!(registry.get("R_25").unwrap().last_digits(1).unwrap(), vec![2]);
    }

    #[test]
    fn subscribe_is_idempotent() {
        let mut registry = TickRegistry::default();
        registry.subscribe("R_50").append(1.5).unwrap();
        registry.subscribe("R_50");
        assert_eq!(registry.window("R_50").unwrap().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unsubscribe_destroys_window() {
        let mut registry = TickRegistry::default();
        registry.append("R_75", 7.5).unwrap();
        assert!(registry.unsubscribe("R_75"));
        assert!(!registry.unsubscribe("R_75"));
        assert!(registry.window("R_75").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_symbol_is_error() {
        let registry = TickRegistry::default();
        assert!(matches!(
            registry.get("R_100"),
            Err(TickError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn symbol_override_applies() {
        let small = WindowConfig::new(2)
            .unwrap()
            .with_digit_format(DigitFormat::Fixed(2));
        let mut registry = TickRegistry::default().with_symbol_config("1HZ10V", small);
        for p in [1.10, 1.20, 1.30] {
            registry.append("1HZ10V", p).unwrap();
            registry.append("R_10", p).unwrap();
        }
        let hz = registry.window("1HZ10V").unwrap();
        assert_eq!(hz.capacity(), 2);
        assert_eq!(hz.last_digits(2).unwrap(), vec![0, 0]);
        let r10 = registry.window("R_10").unwrap();
        assert_eq!(r10.capacity(), 255);
        assert_eq!(r10.last_digits(3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn append_tick_routes_by_symbol() {
        let mut registry = TickRegistry::default();
        registry.append_tick(&Tick::new("R_25", "100.07")).unwrap();
        assert!(registry.append_tick(&Tick::new("R_25", "oops")).is_err());
        let w = registry.window("R_25").unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w.rejected(), 1);
    }

    #[test]
    fn seed_replaces_history() {
        let mut registry = TickRegistry::new(WindowConfig::new(4).unwrap());
        registry.append("R_100", 9.99).unwrap();
        let rejected = registry.seed("R_100", (1..=10).map(|i| i as f64 + 0.1 * i as f64));
        assert_eq!(rejected, 0);
        let w = registry.window("R_100").unwrap();
        assert_eq!(w.len(), 4);
        assert_eq!(w.latest().unwrap().price, 11.0);
    }

    #[test]
    fn shared_registry_reads_consistent_window() {
        let shared = SharedTickRegistry::new(WindowConfig::default());
        for p in [1.12, 1.14, 1.16] {
            shared.append("R_100", p).unwrap();
        }
        let even = shared
            .read("R_100", |w| w.even_odd_percentage(Parity::Even, 3))
            .unwrap()
            .unwrap();
        assert_eq!(even, 100.0);
        assert!(matches!(
            shared.read("R_10", |w| w.len()),
            Err(TickError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn shared_registry_concurrent_appends() {
        let shared = SharedTickRegistry::new(WindowConfig::new(50).unwrap());
        thread::scope(|s| {
            for t in 0..4 {
                let shared = shared.clone();
                s.spawn(move || {
                    for i in 0..100 {
                        let symbol = if t % 2 == 0 { "R_10" } else { "R_25" };
                        shared.append(symbol, 100.0 + i as f64 * 0.01).unwrap();
                        let len = shared.read(symbol, |w| w.len()).unwrap();
                        assert!(len <= 50);
                    }
                });
            }
        });
        assert_eq!(shared.symbols(), vec!["R_10", "R_25"]);
        assert_eq!(shared.read("R_10", |w| w.len()).unwrap(), 50);
        assert!(shared
            .read("R_25", |w| w.frequency_rank(50, FrequencyRank::Most))
            .unwrap()
            .is_ok());
    }

    #[test]
    fn shared_unsubscribe_matches_owned_registry() {
        let mut owned = TickRegistry::default();
        let shared = SharedTickRegistry::new(WindowConfig::default());
        owned.append("R_75", 7.5).unwrap();
        shared.append("R_75", 7.5).unwrap();

        assert_eq!(owned.unsubscribe("R_75"), shared.unsubscribe("R_75"));
        assert_eq!(owned.unsubscribe("R_75"), shared.unsubscribe("R_75"));
        assert!(shared.symbols().is_empty());
    }

    #[test]
    fn into_shared_keeps_windows_and_overrides() {
        let mut registry =
            TickRegistry::default().with_symbol_config("R_50", WindowConfig::new(1).unwrap());
        registry.append("R_10", 3.3).unwrap();
        let shared = registry.into_shared();
        assert_eq!(shared.read("R_10", |w| w.len()).unwrap(), 1);
        shared.append("R_50", 1.0).unwrap();
        shared.append("R_50", 2.0).unwrap();
        assert_eq!(shared.read("R_50", |w| w.len()).unwrap(), 1);
        assert!(shared.unsubscribe("R_10"));
        assert!(matches!(
            shared.read("R_10", |w| w.len()),
            Err(TickError::UnknownSymbol { .. })
        ));
    }
}
