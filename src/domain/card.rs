//! Card primitives
//!
//! Card number generation and validation plus expiry and CVV helpers.
//! Issued numbers carry the AuraPay issuer prefix followed by a random
//! zero-padded 12-digit suffix; uniqueness is enforced by the store.

use chrono::{Months, NaiveDate, Utc};
use rand::Rng;
use std::fmt;

/// Issuer identification prefix for all AuraPay cards
pub const ISSUER_PREFIX: &str = "4576";

/// Total length of a card number in digits
pub const CARD_NUMBER_LEN: usize = 16;

/// Exclusive upper bound for the random 12-digit suffix
const SUFFIX_BOUND: u64 = 1_000_000_000_000;

/// Months until an issued card expires
const EXPIRY_MONTHS: u32 = 24;

/// A validated 16-digit card number.
///
/// Stored and compared in raw form (no separators). Display grouping is
/// applied explicitly via [`CardNumber::grouped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

/// Errors that can occur when validating a card number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("Card number must be exactly {CARD_NUMBER_LEN} digits (got {0})")]
    InvalidLength(usize),

    #[error("Card number must contain only digits")]
    NotNumeric,
}

impl CardNumber {
    /// Generate a fresh candidate number with the issuer prefix.
    ///
    /// Candidates are not checked for uniqueness here; the caller inserts
    /// and retries on the store's unique-constraint violation.
    pub fn generate() -> Self {
        let suffix: u64 = rand::thread_rng().gen_range(0..SUFFIX_BOUND);
        Self(format!("{}{:012}", ISSUER_PREFIX, suffix))
    }

    /// Validate an externally supplied card number.
    pub fn parse(raw: &str) -> Result<Self, CardError> {
        if raw.len() != CARD_NUMBER_LEN {
            return Err(CardError::InvalidLength(raw.len()));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardError::NotNumeric);
        }

        Ok(Self(raw.to_string()))
    }

    /// Raw 16-digit form, as persisted.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form in 4-digit groups, e.g. `4576 0012 3456 7890`.
    pub fn grouped(&self) -> String {
        group_digits(&self.0)
    }

    /// Last four digits, safe for logging.
    pub fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }
}

impl From<CardNumber> for String {
    fn from(number: CardNumber) -> Self {
        number.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full numbers stay out of logs; render the tail only
        write!(f, "•••• {}", self.last_four())
    }
}

/// Group a raw digit string into space-separated blocks of four.
pub fn group_digits(raw: &str) -> String {
    raw.as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expiry for a card issued today, formatted `MM/YY`.
pub fn generate_expiry() -> String {
    expiry_from(Utc::now().date_naive())
}

/// Expiry two years after the given issuance date, formatted `MM/YY`.
pub fn expiry_from(issued_on: NaiveDate) -> String {
    let expires_on = issued_on
        .checked_add_months(Months::new(EXPIRY_MONTHS))
        .expect("expiry month addition overflowed");
    expires_on.format("%m/%y").to_string()
}

/// Random 3-digit CVV in [100, 999].
pub fn generate_cvv() -> String {
    rand::thread_rng().gen_range(100..=999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_number_shape() {
        for _ in 0..100 {
            let number = CardNumber::generate();
            assert_eq!(number.as_str().len(), CARD_NUMBER_LEN);
            assert!(number.as_str().starts_with(ISSUER_PREFIX));
            assert!(number.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generated_numbers_reparse() {
        let number = CardNumber::generate();
        assert_eq!(CardNumber::parse(number.as_str()), Ok(number));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            CardNumber::parse("45761"),
            Err(CardError::InvalidLength(5))
        ));
        assert!(matches!(
            CardNumber::parse("45760012345678901"),
            Err(CardError::InvalidLength(17))
        ));
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!(matches!(
            CardNumber::parse("4576 0012 3456 7"),
            Err(CardError::NotNumeric)
        ));
        assert!(matches!(
            CardNumber::parse("4576001234567abc"),
            Err(CardError::NotNumeric)
        ));
    }

    #[test]
    fn test_grouped_display() {
        let number = CardNumber::parse("4576001234567890").unwrap();
        assert_eq!(number.grouped(), "4576 0012 3456 7890");
        assert_eq!(number.last_four(), "7890");
        assert_eq!(number.to_string(), "•••• 7890");
    }

    #[test]
    fn test_expiry_two_years_out() {
        let issued = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        assert_eq!(expiry_from(issued), "08/28");
    }

    #[test]
    fn test_expiry_clamps_leap_day() {
        let issued = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(expiry_from(issued), "02/26");
    }

    #[test]
    fn test_expiry_format() {
        let rendered = generate_expiry();
        assert_eq!(rendered.len(), 5);
        let (month, year) = rendered.split_once('/').unwrap();
        let month: u32 = month.parse().unwrap();
        assert!((1..=12).contains(&month));
        assert_eq!(year.len(), 2);
        assert!(year.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_cvv_range() {
        for _ in 0..100 {
            let cvv = generate_cvv();
            let value: u32 = cvv.parse().unwrap();
            assert_eq!(cvv.len(), 3);
            assert!((100..=999).contains(&value));
        }
    }
}
