//! Sudanese phone number type.
//!
//! Phone numbers are the account identifier for Nabta: users register and
//! log in with them. All numbers are normalised to the international
//! `+249XXXXXXXXX` form before they are stored or compared, so a customer
//! who registered with `0912345678` can log in with `+249912345678`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not match any accepted Sudanese format.
    #[error("invalid Sudanese phone number")]
    InvalidFormat,
}

/// A validated, normalised Sudanese phone number.
///
/// ## Accepted input formats
///
/// - `09XXXXXXXX` (local, 10 digits)
/// - `249XXXXXXXXX` (international without `+`)
/// - `+249XXXXXXXXX` (full international)
///
/// Spaces and dashes are stripped before validation. The stored value is
/// always the full international form.
///
/// ## Examples
///
/// ```
/// use nabta_core::Phone;
///
/// let phone = Phone::parse("0912 345 678").unwrap();
/// assert_eq!(phone.as_str(), "+249912345678");
///
/// assert!(Phone::parse("0512345678").is_err());
/// assert!(Phone::parse("+1555123456").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string, normalising to `+249XXXXXXXXX`.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for empty input and
    /// [`PhoneError::InvalidFormat`] when the digits do not match any of the
    /// accepted Sudanese formats.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let cleaned: String = s.chars().filter(|c| *c != ' ' && *c != '-').collect();

        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        if let Some(rest) = cleaned.strip_prefix("+249") {
            if is_digits(rest, 9) {
                return Ok(Self(cleaned));
            }
        } else if let Some(rest) = cleaned.strip_prefix("249") {
            if is_digits(rest, 9) {
                return Ok(Self(format!("+{cleaned}")));
            }
        } else if let Some(rest) = cleaned.strip_prefix("09") {
            if is_digits(rest, 8) {
                // 09XXXXXXXX -> +2499XXXXXXXX
                return Ok(Self(format!("+2499{rest}")));
            }
        }

        Err(PhoneError::InvalidFormat)
    }

    /// Returns the normalised phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `s` is exactly `len` ASCII digits.
fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_format() {
        let phone = Phone::parse("0912345678").expect("valid");
        assert_eq!(phone.as_str(), "+249912345678");
    }

    #[test]
    fn test_parse_international_without_plus() {
        let phone = Phone::parse("249912345678").expect("valid");
        assert_eq!(phone.as_str(), "+249912345678");
    }

    #[test]
    fn test_parse_full_international() {
        let phone = Phone::parse("+249912345678").expect("valid");
        assert_eq!(phone.as_str(), "+249912345678");
    }

    #[test]
    fn test_spaces_and_dashes_stripped() {
        let phone = Phone::parse("0912-345 678").expect("valid");
        assert_eq!(phone.as_str(), "+249912345678");
    }

    #[test]
    fn test_all_formats_normalise_to_same_value() {
        let a = Phone::parse("0912345678").expect("valid");
        let b = Phone::parse("249912345678").expect("valid");
        let c = Phone::parse("+249912345678").expect("valid");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse(" - "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        assert_eq!(Phone::parse("091234567"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("09123456789"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("+24991234567"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn test_foreign_numbers_rejected() {
        assert_eq!(Phone::parse("+1555123456"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("0512345678"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn test_non_digit_rejected() {
        assert_eq!(Phone::parse("09abc45678"), Err(PhoneError::InvalidFormat));
    }
}
