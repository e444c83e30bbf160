//! Numeric quantities that remember whether they were written as integers.
//!
//! A pile of "10" pounds must reload as the integer 10, and "10.50" acres must
//! reload as "10.50", not "10.5" and not 10. [`Amount`] keeps the decimal scale
//! alongside the unscaled digits so the text form is reproduced exactly.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer or fixed-scale decimal quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Amount {
    Integer(i64),
    /// `unscaled / 10^scale`; `scale` is at least 1.
    Decimal { unscaled: i64, scale: u32 },
}

impl Amount {
    pub fn is_integer(&self) -> bool {
        matches!(self, Amount::Integer(_))
    }

    /// Approximate value, for display and arithmetic outside persistence.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Amount::Integer(value) => value as f64,
            Amount::Decimal { unscaled, scale } => unscaled as f64 / 10f64.powi(scale as i32),
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Integer(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Amount::Integer(value) => write!(f, "{}", value),
            Amount::Decimal { unscaled, scale } => {
                let divisor = 10u64.pow(scale);
                let magnitude = unscaled.unsigned_abs();
                let sign = if unscaled < 0 { "-" } else { "" };
                write!(
                    f,
                    "{}{}.{:0width$}",
                    sign,
                    magnitude / divisor,
                    magnitude % divisor,
                    width = scale as usize
                )
            }
        }
    }
}

impl std::str::FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || DomainError::parse(format!("Invalid quantity: {}", s));
        let Some((whole, fraction)) = text.split_once('.') else {
            return text.parse::<i64>().map(Amount::Integer).map_err(|_| invalid());
        };
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let negative = whole.starts_with('-');
        let digits = whole.trim_start_matches(['-', '+']);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        let combined = format!("{}{}", digits, fraction);
        let magnitude: i64 = combined.parse().map_err(|_| invalid())?;
        // Scales beyond this overflow the Display divisor.
        if scale > 18 {
            return Err(invalid());
        }
        Ok(Amount::Decimal {
            unscaled: if negative { -magnitude } else { magnitude },
            scale,
        })
    }
}

impl TryFrom<String> for Amount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

/// An amount together with its unit of measure ("pounds", "acres", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: Amount,
    pub units: String,
}

impl Quantity {
    pub fn new(amount: Amount, units: impl Into<String>) -> Self {
        Self {
            amount,
            units: units.into(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_empty() {
            write!(f, "{}", self.amount)
        } else {
            write!(f, "{} {}", self.amount, self.units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_stays_integer() {
        let amount: Amount = "10".parse().expect("valid");
        assert_eq!(amount, Amount::Integer(10));
        assert_eq!(amount.to_string(), "10");
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let amount: Amount = "10.50".parse().expect("valid");
        assert_eq!(
            amount,
            Amount::Decimal {
                unscaled: 1050,
                scale: 2
            }
        );
        assert_eq!(amount.to_string(), "10.50");
        assert!(!amount.is_integer());
    }

    #[test]
    fn test_negative_fraction() {
        let amount: Amount = "-0.05".parse().expect("valid");
        assert_eq!(amount.to_string(), "-0.05");
        assert!((amount.as_f64() + 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decimal_and_integer_are_distinct() {
        let whole: Amount = "3".parse().expect("valid");
        let decimal: Amount = "3.0".parse().expect("valid");
        assert_ne!(whole, decimal);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("1.".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("ten".parse::<Amount>().is_err());
    }

    #[test]
    fn test_serializes_as_text() {
        let amount: Amount = "2.25".parse().expect("valid");
        let json = serde_json::to_string(&amount).expect("serialize");
        assert_eq!(json, "\"2.25\"");
    }
}
