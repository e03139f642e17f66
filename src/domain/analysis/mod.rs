//! Pure digit and price analyses.
//!
//! Every function here works on a plain slice so it can be tested without a
//! window. The selector enums parse from the tags used in query text
//! (`all_even`, `greater_equal`, `second_least`, ...).

pub mod comparison;
pub mod distribution;
pub mod frequency;
pub mod parity;
pub mod pattern;
pub mod trend;

use crate::domain::error::TickError;
use std::fmt;
use std::str::FromStr;

pub use comparison::compare_digits;
pub use distribution::digit_distribution;
pub use frequency::{digit_counts, frequency_rank};
pub use parity::{parity_percentage, parity_split};
pub use pattern::check_pattern;
pub use trend::{trend_percentage, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    AllEven,
    AllOdd,
    AllSame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyRank {
    Most,
    SecondMost,
    Least,
    SecondLeast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn matches(self, digit: u8) -> bool {
        match self {
            Parity::Even => digit % 2 == 0,
            Parity::Odd => digit % 2 == 1,
        }
    }
}

impl ComparisonOperator {
    pub fn apply(self, digit: u8, target: u8) -> bool {
        match self {
            ComparisonOperator::Equal => digit == target,
            ComparisonOperator::Greater => digit > target,
            ComparisonOperator::Less => digit < target,
            ComparisonOperator::GreaterEqual => digit >= target,
            ComparisonOperator::LessEqual => digit <= target,
        }
    }
}

/// Round half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unknown(kind: &str, tag: &str, expected: &str) -> TickError {
    TickError::invalid(format!("unknown {kind} '{tag}' (expected {expected})"))
}

impl FromStr for Pattern {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_even" => Ok(Pattern::AllEven),
            "all_odd" => Ok(Pattern::AllOdd),
            "all_same" => Ok(Pattern::AllSame),
            _ => Err(unknown("pattern", s, "all_even, all_odd or all_same")),
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "=" | "==" => Ok(ComparisonOperator::Equal),
            "greater" | ">" => Ok(ComparisonOperator::Greater),
            "less" | "<" => Ok(ComparisonOperator::Less),
            "greater_equal" | ">=" => Ok(ComparisonOperator::GreaterEqual),
            "less_equal" | "<=" => Ok(ComparisonOperator::LessEqual),
            _ => Err(unknown(
                "operator",
                s,
                "equal, greater, less, greater_equal or less_equal",
            )),
        }
    }
}

impl FromStr for FrequencyRank {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most" => Ok(FrequencyRank::Most),
            "second_most" => Ok(FrequencyRank::SecondMost),
            "least" => Ok(FrequencyRank::Least),
            "second_least" => Ok(FrequencyRank::SecondLeast),
            _ => Err(unknown(
                "rank",
                s,
                "most, second_most, least or second_least",
            )),
        }
    }
}

impl FromStr for Parity {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Ok(Parity::Even),
            "odd" => Ok(Parity::Odd),
            _ => Err(unknown("parity", s, "even or odd")),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pattern::AllEven => "all_even",
            Pattern::AllOdd => "all_odd",
            Pattern::AllSame => "all_same",
        })
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOperator::Equal => "equal",
            ComparisonOperator::Greater => "greater",
            ComparisonOperator::Less => "less",
            ComparisonOperator::GreaterEqual => "greater_equal",
            ComparisonOperator::LessEqual => "less_equal",
        })
    }
}

impl fmt::Display for FrequencyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrequencyRank::Most => "most",
            FrequencyRank::SecondMost => "second_most",
            FrequencyRank::Least => "least",
            FrequencyRank::SecondLeast => "second_least",
        })
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        })
    }
}
