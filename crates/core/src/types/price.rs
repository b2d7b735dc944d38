//! Type-safe cost representation using decimal arithmetic.
//!
//! The QKART backend sends unit costs as plain JSON numbers (`"cost": 100`).
//! They are held as [`Decimal`] so cart totals never accumulate float error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit cost or cart total.
///
/// Serialized as a JSON number, matching the backend's payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Cost {
    /// Zero cost.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new cost.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<u32> for Cost {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.normalize())
    }
}

impl Add for Cost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Cost {
    type Output = Self;

    fn mul(self, qty: u32) -> Self {
        Self(self.0 * Decimal::from(qty))
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_from_json_integer() {
        let cost: Cost = serde_json::from_str("100").unwrap();
        assert_eq!(cost, Cost::from(100));
    }

    #[test]
    fn test_cost_from_json_float() {
        let cost: Cost = serde_json::from_str("12.5").unwrap();
        assert_eq!(cost.amount(), Decimal::new(125, 1));
    }

    #[test]
    fn test_cost_display_drops_trailing_zeros() {
        assert_eq!(Cost::new(Decimal::new(1000, 2)).to_string(), "$10");
        assert_eq!(Cost::new(Decimal::new(1050, 2)).to_string(), "$10.5");
    }

    #[test]
    fn test_cost_arithmetic() {
        let total: Cost = [Cost::from(10) * 2, Cost::from(20)].into_iter().sum();
        assert_eq!(total, Cost::from(40));
    }
}
