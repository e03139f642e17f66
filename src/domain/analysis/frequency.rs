//! Digit frequency ranking.
//!
//! Candidates are the digits that occur at least once, ordered by count
//! descending with ties broken by ascending digit value. `Most` is the head
//! of that order and `Least` its tail. When fewer than two distinct digits
//! occur the "second" ranks resolve to their primary rank.

use crate::domain::analysis::FrequencyRank;

/// Occurrence count of each digit 0-9. Values above 9 are ignored.
pub fn digit_counts(digits: &[u8]) -> [usize; 10] {
    let mut counts = [0usize; 10];
    for &d in digits {
        if let Some(slot) = counts.get_mut(d as usize) {
            *slot += 1;
        }
    }
    counts
}

/// Observed digits in rank order.
pub fn ranked_digits(digits: &[u8]) -> Vec<u8> {
    let counts = digit_counts(digits);
    let mut ranked: Vec<u8> = (0..10u8).filter(|&d| counts[d as usize] > 0).collect();
    ranked.sort_by(|a, b| {
        counts[*b as usize]
            .cmp(&counts[*a as usize])
            .then_with(|| a.cmp(b))
    });
    ranked
}

/// Digit at `rank`, or `None` for an empty slice.
pub fn frequency_rank(digits: &[u8], rank: FrequencyRank) -> Option<u8> {
    let ranked = ranked_digits(digits);
    let last = ranked.len().checked_sub(1)?;
    let index = match rank {
        FrequencyRank::Most => 0,
        FrequencyRank::SecondMost => last.min(1),
        FrequencyRank::Least => last,
        FrequencyRank::SecondLeast => last.saturating_sub(1),
    };
    ranked.get(index).copied()
}
