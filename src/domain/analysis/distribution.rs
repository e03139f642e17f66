//! Per-digit occurrence percentages.

use crate::domain::analysis::{digit_counts, round2};

/// Percentage (two decimals) of each digit 0-9; all zeros when empty.
pub fn digit_distribution(digits: &[u8]) -> [f64; 10] {
    let mut distribution = [0.0; 10];
    if digits.is_empty() {
        return distribution;
    }
    let total = digits.len() as f64;
    for (slot, count) in distribution.iter_mut().zip(digit_counts(digits)) {
        *slot = round2(count as f64 / total * 100.0);
    }
    distribution
}
