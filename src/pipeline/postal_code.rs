//! Postal code (CEP) syntax.

use std::fmt;
use thiserror::Error;

/// Number of digits in a CEP.
pub const POSTAL_CODE_LEN: usize = 8;

/// True iff `code` is exactly eight ASCII digits.
pub fn validate(code: &str) -> bool {
    code.len() == POSTAL_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// A syntactically valid CEP. Only constructible through [`PostalCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid postal code: {0:?}")]
pub struct InvalidPostalCode(pub String);

impl PostalCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidPostalCode> {
        if validate(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidPostalCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
