//! Configuration validation and construction of window settings.
//!
//! `[window]` holds the defaults, `[symbol.<S>]` sections override them per
//! symbol and `[feed]` describes where recorded ticks come from.

use crate::domain::error::TickError;
use crate::domain::quote::{DigitFormat, MAX_PIP_DECIMALS};
use crate::domain::registry::TickRegistry;
use crate::domain::window::WindowConfig;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub const WINDOW_SECTION: &str = "window";
pub const FEED_SECTION: &str = "feed";
pub const SYMBOL_SECTION_PREFIX: &str = "symbol.";

pub fn validate_window_config(config: &dyn ConfigPort) -> Result<(), TickError> {
    validate_window_section(config, WINDOW_SECTION)?;
    for (section, symbol) in symbol_sections(config) {
        if symbol.trim().is_empty() {
            return Err(TickError::ConfigInvalid {
                section,
                key: "symbol".to_string(),
                reason: "symbol section must name a symbol".to_string(),
            });
        }
        validate_window_section(config, &section)?;
    }
    Ok(())
}

pub fn validate_feed_config(config: &dyn ConfigPort) -> Result<(), TickError> {
    if let Some(raw) = config.get_string(FEED_SECTION, "symbols") {
        parse_symbols(&raw)?;
    }
    Ok(())
}

fn validate_window_section(config: &dyn ConfigPort, section: &str) -> Result<(), TickError> {
    if let Some(capacity) = read_int(config, section, "capacity")? {
        if capacity < 1 {
            return Err(TickError::ConfigInvalid {
                section: section.to_string(),
                key: "capacity".to_string(),
                reason: "capacity must be at least 1".to_string(),
            });
        }
    }
    if let Some(decimals) = read_int(config, section, "pip_decimals")? {
        if !(0..=i64::from(MAX_PIP_DECIMALS)).contains(&decimals) {
            return Err(TickError::ConfigInvalid {
                section: section.to_string(),
                key: "pip_decimals".to_string(),
                reason: format!("pip_decimals must be between 0 and {}", MAX_PIP_DECIMALS),
            });
        }
    }
    Ok(())
}

fn read_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, TickError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| TickError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected an integer, got '{}'", raw),
            }),
    }
}

/// `(section, symbol)` for every `[symbol.<S>]` section, sorted by symbol.
fn symbol_sections(config: &dyn ConfigPort) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = config
        .sections()
        .into_iter()
        .filter_map(|section| {
            let symbol = section.strip_prefix(SYMBOL_SECTION_PREFIX)?.to_string();
            Some((section, symbol))
        })
        .collect();
    sections.sort_by(|a, b| a.1.cmp(&b.1));
    sections
}

/// Symbols that have a `[symbol.<S>]` override, sorted.
pub fn override_symbols(config: &dyn ConfigPort) -> Vec<String> {
    symbol_sections(config)
        .into_iter()
        .map(|(_, symbol)| symbol)
        .collect()
}

/// Split a comma-separated symbol list. Blank entries and duplicates are
/// rejected.
pub fn parse_symbols(raw: &str) -> Result<Vec<String>, TickError> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for token in raw.split(',') {
        let symbol = token.trim();
        if symbol.is_empty() {
            return Err(TickError::ConfigInvalid {
                section: FEED_SECTION.to_string(),
                key: "symbols".to_string(),
                reason: "empty symbol in list".to_string(),
            });
        }
        if !seen.insert(symbol.to_string()) {
            return Err(TickError::ConfigInvalid {
                section: FEED_SECTION.to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol '{}'", symbol),
            });
        }
        symbols.push(symbol.to_string());
    }
    Ok(symbols)
}

/// Read one window section on top of `base`. Keys the section does not set
/// keep the value from `base`.
pub fn build_window_config(
    config: &dyn ConfigPort,
    section: &str,
    base: WindowConfig,
) -> Result<WindowConfig, TickError> {
    validate_window_section(config, section)?;

    let mut window = base;
    if let Some(capacity) = read_int(config, section, "capacity")? {
        let capacity = usize::try_from(capacity).map_err(|_| TickError::ConfigInvalid {
            section: section.to_string(),
            key: "capacity".to_string(),
            reason: format!("capacity out of range: {}", capacity),
        })?;
        window = WindowConfig::new(capacity)?.with_digit_format(window.digit_format());
    }
    if let Some(decimals) = read_int(config, section, "pip_decimals")? {
        // Range already checked above.
        window = window.with_digit_format(DigitFormat::Fixed(decimals as u32));
    }
    Ok(window)
}

/// Registry with `[window]` defaults and every `[symbol.<S>]` override.
pub fn build_registry(config: &dyn ConfigPort) -> Result<TickRegistry, TickError> {
    validate_window_config(config)?;

    let defaults = build_window_config(config, WINDOW_SECTION, WindowConfig::default())?;
    let mut registry = TickRegistry::new(defaults);
    for (section, symbol) in symbol_sections(config) {
        let window = build_window_config(config, &section, defaults)?;
        registry = registry.with_symbol_config(symbol, window);
    }
    Ok(registry)
}

/// The `[feed] symbols` subset, if configured.
pub fn feed_symbols(config: &dyn ConfigPort) -> Result<Option<Vec<String>>, TickError> {
    config
        .get_string(FEED_SECTION, "symbols")
        .map(|raw| parse_symbols(&raw))
        .transpose()
}
