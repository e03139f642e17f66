//! Relational comparison of every digit against a target digit.

use crate::domain::analysis::ComparisonOperator;

/// True iff the slice is non-empty and every digit satisfies `digit <op> target`.
pub fn compare_digits(digits: &[u8], operator: ComparisonOperator, target: u8) -> bool {
    !digits.is_empty() && digits.iter().all(|&d| operator.apply(d, target))
}
