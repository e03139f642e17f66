//! Replay recorded ticks into a registry, the same way a live feed would.

use crate::domain::error::TickError;
use crate::domain::registry::TickRegistry;
use crate::ports::tick_port::TickPort;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub symbol: String,
    pub accepted: usize,
    pub rejected: usize,
}

/// Append every recorded tick for `symbols` in arrival order. Symbols with
/// no ticks are skipped with a warning and get no window.
pub fn replay(
    port: &dyn TickPort,
    registry: &mut TickRegistry,
    symbols: &[String],
) -> Result<Vec<ReplaySummary>, TickError> {
    let mut summaries = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let ticks = port.fetch_ticks(symbol)?;
        if ticks.is_empty() {
            warn!(symbol = %symbol, "no recorded ticks, skipping");
            continue;
        }

        let mut summary = ReplaySummary {
            symbol: symbol.clone(),
            accepted: 0,
            rejected: 0,
        };
        for tick in &ticks {
            match registry.append_tick(tick) {
                Ok(()) => summary.accepted += 1,
                Err(_) => summary.rejected += 1,
            }
        }
        info!(
            symbol = %symbol,
            accepted = summary.accepted,
            rejected = summary.rejected,
            "replayed ticks"
        );
        summaries.push(summary);
    }

    Ok(summaries)
}
