//! Fixed-point monetary amounts with two decimal places.
//!
//! Uses `rust_decimal` internally with scale enforcement so that prices,
//! discounts and tips never pick up floating-point error.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// A monetary amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use checkout_engine::Money;
///
/// let price = Money::from_str("3").unwrap();
/// assert_eq!(price.to_string(), "3.00");
/// assert_eq!(format!("{:>7}", price), "   3.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest amount accepted for a single price or tip, in cents.
    ///
    /// Keeps basket arithmetic far below `Decimal`'s overflow point.
    pub const MAX_CENTS: i64 = 100_000_000_000;

    /// Creates a new `Money` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Money(rounded)
    }

    /// Creates an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// The underlying decimal value.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// The largest price or tip the till accepts (1,000,000,000.00).
    pub fn max_amount() -> Self {
        Money::from_cents(Self::MAX_CENTS)
    }

    /// Returns `true` if the amount lies in `0..=max_amount()`.
    pub fn is_valid_amount(&self) -> bool {
        !self.is_negative() && *self <= Self::max_amount()
    }

    /// Multiplies by an arbitrary factor, rounding the result back to 2 places.
    pub fn scale_by(self, factor: Decimal) -> Self {
        Money::new(self.0 * factor)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so callers can right-align prices in columns
        f.pad(&format!("{:.2}", self.0))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Money::new(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(Money::from_str("3").unwrap().to_string(), "3.00");
        assert_eq!(Money::from_str("1.5").unwrap().to_string(), "1.50");
        assert_eq!(Money::from_str("  2.25  ").unwrap().to_string(), "2.25");
    }

    #[test]
    fn test_from_str_rounds_extra_places() {
        assert_eq!(Money::from_str("1.005").unwrap().to_string(), "1.01");
        assert_eq!(Money::from_str("1.004").unwrap().to_string(), "1.00");
    }

    #[test]
    fn test_display_honours_width() {
        let m = Money::from_cents(300);
        assert_eq!(format!("{:>7}", m), "   3.00");
        assert_eq!(format!("{:<6}|", m), "3.00  |");
    }

    #[test]
    fn test_line_total_and_sum() {
        let price = Money::from_cents(250);
        assert_eq!((price * 3).to_string(), "7.50");

        let total: Money = vec![price, Money::from_cents(125)].into_iter().sum();
        assert_eq!(total.to_string(), "3.75");
    }

    #[test]
    fn test_scale_by_rounds_to_cents() {
        let price = Money::from_cents(333);
        assert_eq!(price.scale_by(Decimal::new(9, 1)).to_string(), "3.00");
        assert_eq!(Money::from_cents(300).scale_by(Decimal::new(9, 1)).to_string(), "2.70");
    }

    #[test]
    fn test_valid_amount_bounds() {
        assert!(Money::ZERO.is_valid_amount());
        assert!(Money::max_amount().is_valid_amount());
        assert!(!Money::from_cents(-1).is_valid_amount());
        assert!(!Money::from_cents(Money::MAX_CENTS + 1).is_valid_amount());
        assert!(!Money::from_str("79228162514264337593543950335")
            .unwrap()
            .is_valid_amount());
    }

    #[test]
    fn test_negative_detection() {
        assert!(Money::from_str("-0.01").unwrap().is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::ZERO.is_zero());
    }
}
