//! Monetary amounts.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Money amount represented in cents to avoid floating point issues.
///
/// Serialized as a bare integer number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity, saturating at the bounds of `i64`.
    pub fn multiply(&self, quantity: i64) -> Money {
        Money {
            cents: self.cents.saturating_mul(quantity),
        }
    }

    /// Fails with a validation error naming `field` if the amount is negative.
    pub fn ensure_non_negative(self, field: &str) -> Result<Self> {
        if self.is_negative() {
            return Err(DomainError::validation(format!(
                "{field} must be a positive number."
            )));
        }
        Ok(self)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}${}.{:02}",
            (self.cents / 100).abs(),
            self.cents.abs() % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn serializes_as_bare_cents() {
        let json = serde_json::to_value(Money::from_cents(1999)).unwrap();
        assert_eq!(json, serde_json::json!(1999));

        let parsed: Money = serde_json::from_value(serde_json::json!(250)).unwrap();
        assert_eq!(parsed, Money::from_cents(250));
    }

    #[test]
    fn multiply_saturates() {
        assert_eq!(Money::from_cents(300).multiply(4).cents(), 1200);
        assert_eq!(Money::from_cents(2).multiply(i64::MAX).cents(), i64::MAX);
    }

    #[test]
    fn negative_amounts_fail_validation() {
        assert!(Money::from_cents(0).ensure_non_negative("price").is_ok());
        let err = Money::from_cents(-1).ensure_non_negative("price").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
