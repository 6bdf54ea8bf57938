//! Ticker symbol as the collector accepts it from the CLI.
//!
//! The symbol names everything downstream: the store entity key prefix,
//! the history file, the chart file, and the blob keys. Validation here is
//! what keeps those names safe to embed in paths and object keys.

use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 15;

/// Validated, uppercased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize and validate a raw ticker argument.
    ///
    /// Whitespace is trimmed and letters uppercased. Accepted characters
    /// are ASCII alphanumerics plus `.` and `-` (class shares like BRK.B,
    /// dual listings like BF-B), at most 15 of them, starting with a
    /// letter.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = trimmed.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        let mut normalized = String::with_capacity(trimmed.len());
        for (index, ch) in trimmed.chars().enumerate() {
            let ch = ch.to_ascii_uppercase();
            if index == 0 && !ch.is_ascii_alphabetic() {
                return Err(ValidationError::SymbolInvalidStart { ch });
            }
            if !ch.is_ascii_alphanumeric() && ch != '.' && ch != '-' {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
            normalized.push(ch);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
