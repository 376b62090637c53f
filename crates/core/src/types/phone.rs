//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit or separator.
    #[error("phone number contains an invalid character: {0:?}")]
    InvalidCharacter(char),
    /// The `+` prefix appears somewhere other than the start.
    #[error("'+' is only allowed at the start of a phone number")]
    MisplacedPlus,
    /// The number of digits is out of range.
    #[error("phone number must have between {min} and {max} digits (got {got})")]
    DigitCount {
        /// Minimum number of digits.
        min: usize,
        /// Maximum number of digits.
        max: usize,
        /// Number of digits found.
        got: usize,
    },
}

/// A contact phone number.
///
/// Stored as entered (trimmed) so the shop manager sees what the customer
/// typed, but validated to contain a plausible number of digits.
///
/// ## Constraints
///
/// - 7-15 digits (E.164 maximum)
/// - Separators allowed: space, `-`, `(`, `)`
/// - An optional leading `+`
///
/// ## Examples
///
/// ```
/// use techshop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+7 (999) 123-45-67").is_ok());
/// assert!(PhoneNumber::parse("555-0100").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());        // empty
/// assert!(PhoneNumber::parse("12345").is_err());   // too short
/// assert!(PhoneNumber::parse("call me").is_err()); // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Contains characters other than digits and separators
    /// - Has a `+` anywhere but the first position
    /// - Has fewer than 7 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = 0;
        for (i, c) in s.char_indices() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '(' | ')' => {}
                '+' if i == 0 => {}
                '+' => return Err(PhoneError::MisplacedPlus),
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::DigitCount {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits of the number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(PhoneNumber::parse("+7 (999) 123-45-67").is_ok());
        assert!(PhoneNumber::parse("89991234567").is_ok());
        assert!(PhoneNumber::parse("555-0100").is_ok());
        assert!(PhoneNumber::parse("+1 415 555 0100").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = PhoneNumber::parse("  555-0100 ").unwrap();
        assert_eq!(phone.as_str(), "555-0100");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            PhoneNumber::parse("555-01OO"),
            Err(PhoneError::InvalidCharacter('O'))
        );
    }

    #[test]
    fn test_parse_misplaced_plus() {
        assert_eq!(
            PhoneNumber::parse("555+0100"),
            Err(PhoneError::MisplacedPlus)
        );
    }

    #[test]
    fn test_parse_digit_count() {
        assert!(matches!(
            PhoneNumber::parse("123456"),
            Err(PhoneError::DigitCount { got: 6, .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneError::DigitCount { got: 16, .. })
        ));
    }

    #[test]
    fn test_digits() {
        let phone = PhoneNumber::parse("+7 (999) 123-45-67").unwrap();
        assert_eq!(phone.digits(), "79991234567");
    }
}
