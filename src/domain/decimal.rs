//! Exact decimal type for money, rates and ownership percentages.
//!
//! Backed by rust_decimal. Values cross the serde boundary as strings only, so a
//! binary float can never reach a monetary figure.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Number of fractional digits carried by every monetary output.
pub const MONEY_SCALE: u32 = 2;

/// Number of fractional digits accepted for an ownership percentage.
pub const PERCENT_SCALE: u32 = 2;

/// Rounding applied to monetary figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoint rounds away from zero (12.345 -> 12.35).
    #[default]
    HalfUp,
    /// Midpoint rounds to the even neighbour (12.345 -> 12.34).
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Lossless decimal numeric type for royalty calculations.
///
/// Serializes to and from a JSON string (`"2625.00"`). JSON numbers are rejected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::str")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation, no trailing zeros).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// Returns the value 100.
    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    /// Smallest representable money step (0.01).
    pub fn cent() -> Self {
        Decimal(RustDecimal::new(1, MONEY_SCALE))
    }

    /// Whole number of units as a Decimal.
    pub fn from_units(units: u64) -> Self {
        Decimal(RustDecimal::from(units))
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Number of fractional digits stored (after normalization).
    pub fn fractional_digits(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Round to two places with `mode` and pin the scale at two, so `105` renders as `105.00`.
    pub fn round_money(&self, mode: RoundingMode) -> Self {
        let mut rounded = self.0.round_dp_with_strategy(MONEY_SCALE, mode.strategy());
        rounded.rescale(MONEY_SCALE);
        Decimal(rounded)
    }

    /// Truncate toward zero at two places, scale pinned at two.
    pub fn floor_money(&self) -> Self {
        let mut truncated = self.0.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
        truncated.rescale(MONEY_SCALE);
        Decimal(truncated)
    }

    /// `self + rhs`, or `None` when the result is out of range.
    pub fn checked_add(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    pub fn checked_sub(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// `self / rhs`, or `None` on overflow or a zero divisor.
    pub fn checked_div(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// Sum that stops at the first out-of-range partial total.
    pub fn checked_sum<'a, I>(values: I) -> Option<Decimal>
    where
        I: IntoIterator<Item = &'a Decimal>,
    {
        values
            .into_iter()
            .try_fold(Decimal::zero(), |acc, value| acc.checked_add(*value))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::zero(), |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_parse_keeps_value() {
        for s in ["123.456", "0.0001", "1000000", "-123.456", "0", "999999999.999999999"] {
            let decimal = d(s);
            let reparsed = d(&decimal.to_canonical_string());
            assert_eq!(decimal, reparsed, "reparse changed {}", s);
        }
    }

    #[test]
    fn test_decimal_arithmetic_is_exact() {
        // 0.1 + 0.2 is the classic float drift case.
        assert_eq!(d("0.1") + d("0.2"), d("0.3"));
        assert_eq!((d("1000") * d("0.08")).to_canonical_string(), "80");
        assert_eq!((d("10.5") - d("2.5")).to_canonical_string(), "8");
        assert_eq!((d("10") / d("4")).to_canonical_string(), "2.5");
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(d("12.345").round_money(RoundingMode::HalfUp).to_string(), "12.35");
        assert_eq!(d("12.344").round_money(RoundingMode::HalfUp).to_string(), "12.34");
        assert_eq!(d("105").round_money(RoundingMode::HalfUp).to_string(), "105.00");
    }

    #[test]
    fn test_round_money_half_even() {
        assert_eq!(d("12.345").round_money(RoundingMode::HalfEven).to_string(), "12.34");
        assert_eq!(d("12.355").round_money(RoundingMode::HalfEven).to_string(), "12.36");
    }

    #[test]
    fn test_floor_money_truncates() {
        assert_eq!(d("33.339").floor_money().to_string(), "33.33");
        assert_eq!(d("7").floor_money().to_string(), "7.00");
    }

    #[test]
    fn test_json_is_string_only() {
        let json = serde_json::to_value(d("2625.00")).unwrap();
        assert_eq!(json, serde_json::json!("2625.00"));

        let parsed: Decimal = serde_json::from_str("\"0.10\"").unwrap();
        assert_eq!(parsed, d("0.1"));

        assert!(serde_json::from_str::<Decimal>("0.1").is_err());
    }

    #[test]
    fn test_fractional_digits_ignores_trailing_zeros() {
        assert_eq!(d("33.30").fractional_digits(), 1);
        assert_eq!(d("33.333").fractional_digits(), 3);
        assert_eq!(d("50").fractional_digits(), 0);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Decimal::new(RustDecimal::MAX);
        assert_eq!(max.checked_add(d("1")), None);
        assert_eq!(max.checked_mul(d("2")), None);
        assert_eq!(d("-1").checked_sub(max).and_then(|v| v.checked_sub(d("1"))), None);
        assert_eq!(d("1").checked_div(Decimal::zero()), None);
        assert_eq!(Decimal::checked_sum(&[max, d("1")]), None);

        assert_eq!(d("80.00").checked_add(d("25.00")), Some(d("105")));
        assert_eq!(d("10").checked_div(d("4")), Some(d("2.5")));
        assert_eq!(Decimal::checked_sum(&[d("80.00"), d("25.00")]), Some(d("105")));
    }

    #[test]
    fn test_sum() {
        let values = vec![d("80.00"), d("25.00")];
        let total: Decimal = values.iter().sum();
        assert_eq!(total, d("105"));
    }
}
