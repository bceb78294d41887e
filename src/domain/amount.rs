//! Amount type
//!
//! Domain primitive for top-up amounts with business rule validation.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot exist in the system.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Amount represents a validated top-up value.
///
/// # Invariants
/// - Value is always positive (> 0)
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use aurapay::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount is not a representable number")]
    NotRepresentable,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        Ok(Self(value))
    }

    /// Create an Amount from a JSON number.
    ///
    /// # Errors
    /// - `AmountError::NotRepresentable` if the number is NaN, infinite or
    ///   outside decimal range
    /// - `AmountError::NotPositive` if value <= 0
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        let decimal = Decimal::from_f64_retain(value).ok_or(AmountError::NotRepresentable)?;
        Self::new(decimal)
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

/// Format a monetary value with Indian digit grouping and two decimal
/// places, e.g. `1234567.89` becomes `12,34,567.89`.
pub fn format_inr(value: Decimal) -> String {
    let rendered = format!("{:.2}", value);
    let (raw_int, frac) = match rendered.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rendered.as_str(), "00"),
    };
    let (sign, int_digits) = match raw_int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw_int),
    };

    if int_digits.len() <= 3 {
        return format!("{}{}.{}", sign, int_digits, frac);
    }

    // en-IN grouping: last three digits, then groups of two
    let (head, tail) = int_digits.split_at(int_digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while !rest.is_empty() {
        let cut = rest.len().saturating_sub(2);
        let (remaining, group) = rest.split_at(cut);
        groups.push(group);
        rest = remaining;
    }
    groups.reverse();
    groups.push(tail);

    format!("{}{}.{}", sign, groups.join(","), frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(Decimal::new(100, 0));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), Decimal::new(100, 0));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::new(Decimal::new(-100, 0));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_from_f64() {
        let amount = Amount::from_f64(5000.0).unwrap();
        assert_eq!(amount.value(), Decimal::new(5000, 0));
    }

    #[test]
    fn test_amount_from_f64_fractional() {
        let amount = Amount::from_f64(12.5).unwrap();
        assert_eq!(amount.value().to_string(), "12.5");
    }

    #[test]
    fn test_amount_from_f64_zero_rejected() {
        assert!(matches!(
            Amount::from_f64(0.0),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn test_amount_from_f64_nan_rejected() {
        assert!(matches!(
            Amount::from_f64(f64::NAN),
            Err(AmountError::NotRepresentable)
        ));
    }

    #[test]
    fn test_amount_from_f64_infinity_rejected() {
        assert!(matches!(
            Amount::from_f64(f64::INFINITY),
            Err(AmountError::NotRepresentable)
        ));
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Result<Amount, _> = "123.456".parse();
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), Decimal::new(123456, 3));
    }

    #[test]
    fn test_format_inr_small() {
        assert_eq!(format_inr(Decimal::new(0, 0)), "0.00");
        assert_eq!(format_inr(Decimal::new(500, 0)), "500.00");
    }

    #[test]
    fn test_format_inr_thousands() {
        assert_eq!(format_inr(Decimal::new(5000, 0)), "5,000.00");
        assert_eq!(format_inr(Decimal::new(125, 1)), "12.50");
    }

    #[test]
    fn test_format_inr_lakh() {
        assert_eq!(format_inr(Decimal::new(100000, 0)), "1,00,000.00");
    }

    #[test]
    fn test_format_inr_wide() {
        assert_eq!(format_inr(Decimal::new(123456789, 2)), "12,34,567.89");
        assert_eq!(format_inr(Decimal::new(10000000, 0)), "1,00,00,000.00");
    }
}
