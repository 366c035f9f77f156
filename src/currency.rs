//! Currency codes

use crate::error::{Result, TradeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference currency every other currency is resolved against
pub const USD: &str = "USD";

/// Three-letter currency code (ISO 4217 style), always upper-case
///
/// Codes are not restricted to a fixed list: rate files routinely quote
/// currencies nobody enumerated in advance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalise a code ("eur" -> "EUR")
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TradeError::MalformedData(format!(
                "Invalid currency code: '{}'",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The reference currency
    pub fn usd() -> Self {
        Self(USD.to_string())
    }

    pub fn is_usd(&self) -> bool {
        self.0 == USD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = TradeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CurrencyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
