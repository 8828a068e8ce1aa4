//! Exact decimal numerals.

use rug::{ops::Pow, Integer, Rational};
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Returns `10^exp`.
fn power_of_ten(exp: usize) -> Integer {
    Integer::from(10).pow(exp as u32)
}

/// A non-negative terminating decimal, stored as its digits and the number of digits after the
/// decimal point. `3.25` has the digits `325` and a scale of `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Decimal {
    digits: Integer,
    scale: usize,
}

impl Decimal {
    /// Creates a decimal from its digits and scale. Returns [`None`] if the digits are negative
    /// or the scale is zero (which would be an integer).
    pub fn new(digits: Integer, scale: usize) -> Option<Self> {
        (digits >= 0 && scale > 0).then_some(Self { digits, scale })
    }

    /// Parses a decimal written as `123.456`.
    pub fn parse(text: &str) -> Option<Self> {
        let (integer, fraction) = text.split_once('.')?;
        if integer.is_empty()
            || fraction.is_empty()
            || !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let digits = Integer::from_str_radix(&format!("{}{}", integer, fraction), 10).ok()?;
        Self::new(digits, fraction.len())
    }

    /// The digits of the decimal, ignoring the decimal point.
    pub fn digits(&self) -> &Integer {
        &self.digits
    }

    /// The number of digits after the decimal point.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// The exact value of the decimal.
    pub fn to_rational(&self) -> Rational {
        Rational::from((self.digits.clone(), power_of_ten(self.scale)))
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let digits = self.digits.to_string();
        let padded = format!("{:0>width$}", digits, width = self.scale + 1);
        let (integer, fraction) = padded.split_at(padded.len() - self.scale);
        write!(f, "{}.{}", integer, fraction)
    }
}

/// A non-negative recurring decimal such as `3.1[45]`, which is `3.1454545...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RecurringDecimal {
    integer: Integer,
    decimals: String,
    repeating: String,
}

impl RecurringDecimal {
    /// Creates a recurring decimal from its integer part, the digits after the decimal point
    /// that do not repeat (possibly none) and the repeating digits (at least one).
    pub fn new(integer: Integer, decimals: &str, repeating: &str) -> Option<Self> {
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        (integer >= 0 && all_digits(decimals) && !repeating.is_empty() && all_digits(repeating))
            .then(|| Self {
                integer,
                decimals: decimals.to_string(),
                repeating: repeating.to_string(),
            })
    }

    /// The part before the decimal point.
    pub fn integer(&self) -> &Integer {
        &self.integer
    }

    /// The digits after the decimal point that do not repeat.
    pub fn decimals(&self) -> &str {
        &self.decimals
    }

    /// The repeating digits.
    pub fn repeating(&self) -> &str {
        &self.repeating
    }

    /// The exact value of the recurring decimal.
    pub fn to_rational(&self) -> Rational {
        let to_int = |s: &str| Integer::from_str_radix(s, 10).unwrap_or_default();
        let nines = power_of_ten(self.repeating.len()) - 1u32;
        let scale = power_of_ten(self.decimals.len());
        let numerator = to_int(&self.decimals) * nines.clone() + to_int(&self.repeating);
        Rational::from(self.integer.clone()) + Rational::from((numerator, scale * nines))
    }
}

impl Display for RecurringDecimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.integer, self.decimals, self.repeating)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn decimal_display_keeps_leading_zeros() {
        let decimal = Decimal::parse("0.05").unwrap();
        assert_eq!(decimal.digits(), &Integer::from(5));
        assert_eq!(decimal.to_string(), "0.05");
        assert_eq!(Decimal::parse("12.50").unwrap().to_string(), "12.50");
    }

    #[test]
    fn decimal_value() {
        let decimal = Decimal::parse("3.25").unwrap();
        assert_eq!(decimal.to_rational(), Rational::from((13, 4)));
    }

    #[test]
    fn invalid_decimals() {
        assert_eq!(Decimal::parse("3."), None);
        assert_eq!(Decimal::parse(".5"), None);
        assert_eq!(Decimal::new(Integer::from(5), 0), None);
    }

    #[test]
    fn recurring_value() {
        let third = RecurringDecimal::new(Integer::from(0), "", "3").unwrap();
        assert_eq!(third.to_rational(), Rational::from((1, 3)));

        let sixth = RecurringDecimal::new(Integer::from(0), "1", "6").unwrap();
        assert_eq!(sixth.to_rational(), Rational::from((1, 6)));
        assert_eq!(sixth.to_string(), "0.1[6]");
    }
}
