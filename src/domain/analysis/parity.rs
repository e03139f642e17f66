//! Even/odd composition.

use crate::domain::analysis::{round2, Parity};

/// `(even, odd)` percentages. Only the even share is rounded; odd is its
/// complement so the pair always sums to exactly 100. `(0, 0)` when empty.
pub fn parity_split(digits: &[u8]) -> (f64, f64) {
    if digits.is_empty() {
        return (0.0, 0.0);
    }
    let even = digits.iter().filter(|&&d| Parity::Even.matches(d)).count();
    let even_pct = round2(even as f64 / digits.len() as f64 * 100.0);
    (even_pct, 100.0 - even_pct)
}

/// Percentage (0-100, two decimals) of digits with `parity`; 0 when empty.
pub fn parity_percentage(digits: &[u8], parity: Parity) -> f64 {
    let (even, odd) = parity_split(digits);
    match parity {
        Parity::Even => even,
        Parity::Odd => odd,
    }
}
