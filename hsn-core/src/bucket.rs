//! Rate buckets for display styling

use crate::Rate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete display category derived from a GST rate.
///
/// Upper bounds are inclusive: 5 is `Low`, 12 is `Mid`, 18 is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBucket {
    Zero,
    Low,
    Mid,
    High,
    VeryHigh,
}

impl RateBucket {
    pub fn of(rate: Rate) -> Self {
        let value = rate.value();
        if value.is_zero() {
            RateBucket::Zero
        } else if value <= Decimal::from(5) {
            RateBucket::Low
        } else if value <= Decimal::from(12) {
            RateBucket::Mid
        } else if value <= Decimal::from(18) {
            RateBucket::High
        } else {
            RateBucket::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateBucket::Zero => "zero",
            RateBucket::Low => "low",
            RateBucket::Mid => "mid",
            RateBucket::High => "high",
            RateBucket::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for RateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
