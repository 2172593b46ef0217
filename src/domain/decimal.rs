//! Lossless decimal numeric type backed by rust_decimal.
//!
//! TVL figures, percent changes and dominance shares all flow through this
//! type so that sums are exact and repeated runs produce identical bytes.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Lossless decimal numeric type for TVL arithmetic.
///
/// Serializes to a JSON number (not a string) and accepts JSON numbers on input,
/// which is how upstream TVL snapshots encode their values.
///
/// Operators saturate at the representable range instead of panicking; use the
/// `checked_*` methods where overflow must be observed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Parse from a decimal string without going through `f64`.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation, no trailing zeros).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// Returns the value 100.
    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Division that yields `None` for a zero divisor or on overflow.
    pub fn checked_div(self, rhs: Decimal) -> Option<Decimal> {
        if rhs.is_zero() {
            return None;
        }
        self.0.checked_div(rhs.0).map(Decimal)
    }

    pub fn checked_add(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    pub fn checked_sub(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// Round half away from zero to `dp` decimal places.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }
}

// Arithmetic operations
impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0.saturating_mul(rhs.0))
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_canonical_strips_trailing_zeros() {
        assert_eq!(d("130.500").to_canonical_string(), "130.5");
        assert_eq!(d("100").to_canonical_string(), "100");
        assert!(!d("0.0000001").to_canonical_string().contains('e'));
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a = d("10.5");
        let b = d("2.5");

        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((a * b).to_canonical_string(), "26.25");

        let mut acc = Decimal::zero();
        acc += a;
        assert_eq!(acc, a);
    }

    #[test]
    fn test_overflow_saturates_or_reports() {
        let max = d("79228162514264337593543950335");
        assert_eq!(max + d("1"), max);
        assert_eq!(max * d("100"), max);
        assert_eq!(-max - d("1"), -max);
        let total: Decimal = vec![max, max].into_iter().sum();
        assert_eq!(total, max);

        assert_eq!(max.checked_mul(d("100")), None);
        assert_eq!(max.checked_add(d("1")), None);
        assert_eq!(d("2").checked_mul(d("3")), Some(d("6")));
        assert_eq!(d("5").checked_sub(d("7")), Some(d("-2")));
    }

    #[test]
    fn test_checked_div_guards_zero() {
        assert_eq!(d("10").checked_div(Decimal::zero()), None);
        assert_eq!(d("10").checked_div(d("4")), Some(d("2.5")));
    }

    #[test]
    fn test_sum_is_exact() {
        let values = vec![d("0.1"), d("0.2"), d("0.3")];
        let total: Decimal = values.iter().sum();
        assert_eq!(total, d("0.6"));
    }

    #[test]
    fn test_decimal_json_serialization() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.456");

        let parsed: Decimal = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, d("42"));
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(d("3.14159").round_dp(2), d("3.14"));
        assert_eq!(d("2.005").round_dp(2), d("2.01"));
    }

    #[test]
    fn test_ordering_and_abs() {
        assert!(d("10") < d("20"));
        assert!(d("0") > d("-0.5"));
        assert_eq!(d("-3").abs(), d("3"));
        assert_eq!(-d("3"), d("-3"));
    }
}
