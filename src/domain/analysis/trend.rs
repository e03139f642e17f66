//! Rise/fall trend over raw prices.
//!
//! Only strictly rising or falling consecutive pairs count; flat pairs are
//! excluded from the denominator, so the two percentages sum to 100 whenever
//! at least one directional transition exists.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Trend {
    pub rise_percentage: f64,
    pub fall_percentage: f64,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rise {:.2}% / fall {:.2}%",
            self.rise_percentage, self.fall_percentage
        )
    }
}

pub fn trend_percentage(prices: &[f64]) -> Trend {
    let mut rises = 0usize;
    let mut falls = 0usize;
    for pair in prices.windows(2) {
        if pair[1] > pair[0] {
            rises += 1;
        } else if pair[1] < pair[0] {
            falls += 1;
        }
    }

    let total = rises + falls;
    if total == 0 {
        return Trend::default();
    }
    Trend {
        rise_percentage: rises as f64 / total as f64 * 100.0,
        fall_percentage: falls as f64 / total as f64 * 100.0,
    }
}
