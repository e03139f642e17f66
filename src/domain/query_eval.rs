//! Query evaluation against a window snapshot.

use crate::domain::error::TickError;
use crate::domain::query::{Query, QueryOutput};
use crate::domain::window::DigitWindow;

pub fn evaluate(query: &Query, window: &DigitWindow) -> Result<QueryOutput, TickError> {
    let output = match *query {
        Query::Digits { count } => QueryOutput::Digits(window.last_digits(count)?),
        Query::Pattern { count, pattern } => {
            QueryOutput::Flag(window.check_pattern(count, pattern)?)
        }
        Query::Compare {
            count,
            operator,
            target,
        } => QueryOutput::Flag(window.compare_digits(count, operator, target)?),
        Query::Rank { count, rank } => QueryOutput::Digit(window.frequency_rank(count, rank)?),
        Query::Parity { parity, count } => {
            QueryOutput::Percentage(window.even_odd_percentage(parity, count)?)
        }
        Query::Trend { count } => QueryOutput::Trend(window.trend_percentage(count)?),
        Query::Distribution { count } => {
            QueryOutput::Distribution(window.digit_distribution(count)?)
        }
    };
    Ok(output)
}

/// Evaluate every query, stopping at the first failure.
pub fn evaluate_all(
    queries: &[Query],
    window: &DigitWindow,
) -> Result<Vec<QueryOutput>, TickError> {
    queries.iter().map(|q| evaluate(q, window)).collect()
}
