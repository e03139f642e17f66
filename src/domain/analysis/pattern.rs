//! Whole-slice digit patterns.
//!
//! An empty slice never matches: absence of data is not a confirmed pattern.

use crate::domain::analysis::Pattern;

pub fn check_pattern(digits: &[u8], pattern: Pattern) -> bool {
    let Some(&first) = digits.first() else {
        return false;
    };
    match pattern {
        Pattern::AllEven => digits.iter().all(|d| d % 2 == 0),
        Pattern::AllOdd => digits.iter().all(|d| d % 2 == 1),
        Pattern::AllSame => digits.iter().all(|&d| d == first),
    }
}
