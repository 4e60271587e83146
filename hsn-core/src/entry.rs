//! Classification entries and their GST rates

use crate::HsnError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Non-negative percentage rate.
///
/// Stored as a normalized decimal so `18`, `18.0` and `18%` are the same
/// value and bucket boundaries compare exactly. Serialized as `"18%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Create a rate, rejecting negative values
    pub fn new(value: Decimal) -> crate::Result<Self> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(HsnError::InvalidRate(format!("{} is negative", value)));
        }
        Ok(Self(value.normalize()))
    }

    /// Get the raw decimal value (without the percent sign)
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Rate {
    type Err = HsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both "18%" and "18"
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

        let value = Decimal::from_str(number)
            .map_err(|e| HsnError::InvalidRate(format!("{:?}: {}", s, e)))?;
        Self::new(value)
    }
}

impl TryFrom<String> for Rate {
    type Error = HsnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.to_string()
    }
}

/// One row of the classification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// Digit-only HSN code, unique within a table
    pub code: String,
    pub description: String,
    pub rate: Rate,
}

impl ClassificationEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>, rate: Rate) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            rate,
        }
    }
}
