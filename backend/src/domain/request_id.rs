//! Tracking codes shown to customers.
//!
//! A [`RequestId`] is exactly four ASCII digits. Generated codes are always in
//! `1000..=9999`, so a stored code never starts with `0`, but lookups accept
//! any four-digit string and simply miss.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in a tracking code.
pub const REQUEST_ID_LEN: usize = 4;
/// Smallest code the generator draws.
pub const REQUEST_ID_MIN: u16 = 1000;
/// Largest code the generator draws.
pub const REQUEST_ID_MAX: u16 = 9999;

/// Validation errors returned when constructing a [`RequestId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestIdValidationError {
    /// Input did not have exactly four characters.
    #[error("request id must be exactly {REQUEST_ID_LEN} characters, got {actual}")]
    WrongLength {
        /// Character count of the rejected input.
        actual: usize,
    },
    /// Input had four characters but not all were ASCII digits.
    #[error("request id must contain only digits")]
    NonNumeric,
    /// Numeric code outside the generator's range.
    #[error("request id {value} is outside {REQUEST_ID_MIN}..={REQUEST_ID_MAX}")]
    OutOfRange {
        /// The rejected number.
        value: u16,
    },
}

/// Four-digit tracking code for one callback request.
///
/// # Examples
/// ```
/// use callback_desk::domain::RequestId;
///
/// let id = RequestId::new("4821").expect("valid tracking code");
/// assert_eq!(id.as_str(), "4821");
/// assert!(RequestId::new("482").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Validate and wrap a textual tracking code.
    pub fn new(value: impl Into<String>) -> Result<Self, RequestIdValidationError> {
        let value = value.into();
        let actual = value.chars().count();
        if actual != REQUEST_ID_LEN {
            return Err(RequestIdValidationError::WrongLength { actual });
        }
        if !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(RequestIdValidationError::NonNumeric);
        }
        Ok(Self(value))
    }

    /// Build a code from a generator draw.
    pub fn from_code(value: u16) -> Result<Self, RequestIdValidationError> {
        if !(REQUEST_ID_MIN..=REQUEST_ID_MAX).contains(&value) {
            return Err(RequestIdValidationError::OutOfRange { value });
        }
        Ok(Self(value.to_string()))
    }

    /// Borrow the code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<RequestId> for String {
    fn from(value: RequestId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RequestId {
    type Error = RequestIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
