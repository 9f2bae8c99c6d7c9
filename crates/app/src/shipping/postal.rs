//! Postal codes.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors related to postal code parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input does not match the `#####-###` format.
    #[error("postal code {0:?} is not in the #####-### format")]
    InvalidFormat(String),
}

/// A destination or origin postal code in the national `#####-###` format.
///
/// Parsing is strict: no other spellings are accepted, and no I/O is ever
/// attempted for input that fails here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// The postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let well_formed = input.len() == 9
            && input.chars().enumerate().all(|(i, c)| {
                if i == 5 {
                    c == '-'
                } else {
                    c.is_ascii_digit()
                }
            });

        if well_formed {
            Ok(Self(input.to_string()))
        } else {
            Err(PostalCodeError::InvalidFormat(input.to_string()))
        }
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
