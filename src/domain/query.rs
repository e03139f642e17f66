//! Query AST.
//!
//! One variant per window operation. `Display` renders the canonical text
//! form accepted by [`crate::domain::query_parser::parse`].

use crate::domain::analysis::{ComparisonOperator, FrequencyRank, Parity, Pattern, Trend};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Digits {
        count: usize,
    },
    Pattern {
        count: usize,
        pattern: Pattern,
    },
    Compare {
        count: usize,
        operator: ComparisonOperator,
        target: u8,
    },
    Rank {
        count: usize,
        rank: FrequencyRank,
    },
    Parity {
        parity: Parity,
        count: usize,
    },
    Trend {
        count: usize,
    },
    Distribution {
        count: usize,
    },
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Digits { count } => write!(f, "DIGITS({})", count),
            Query::Pattern { count, pattern } => write!(f, "PATTERN({}, {})", count, pattern),
            Query::Compare {
                count,
                operator,
                target,
            } => write!(f, "COMPARE({}, {}, {})", count, operator, target),
            Query::Rank { count, rank } => write!(f, "RANK({}, {})", count, rank),
            Query::Parity { parity, count } => write!(f, "PARITY({}, {})", parity, count),
            Query::Trend { count } => write!(f, "TREND({})", count),
            Query::Distribution { count } => write!(f, "DISTRIBUTION({})", count),
        }
    }
}

/// Result of evaluating a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Flag(bool),
    Digit(u8),
    Digits(Vec<u8>),
    Percentage(f64),
    Trend(Trend),
    Distribution([f64; 10]),
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutput::Flag(flag) => write!(f, "{}", flag),
            QueryOutput::Digit(digit) => write!(f, "{}", digit),
            QueryOutput::Digits(digits) => {
                let joined: Vec<String> = digits.iter().map(u8::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            QueryOutput::Percentage(pct) => write!(f, "{:.2}%", pct),
            QueryOutput::Trend(trend) => write!(f, "{}", trend),
            QueryOutput::Distribution(dist) => {
                let cells: Vec<String> = dist
                    .iter()
                    .enumerate()
                    .map(|(digit, pct)| format!("{}:{:.2}%", digit, pct))
                    .collect();
                write!(f, "{}", cells.join(" "))
            }
        }
    }
}
