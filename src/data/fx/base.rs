//! Rate records and the RateSource trait

use crate::currency::CurrencyCode;
use crate::error::{Result, TradeError};
use std::fmt;

/// One observed exchange statement between two currencies
///
/// `multiplier` is the quoted ratio between `from` and `to`; see
/// [`ConversionResolver`](crate::conversion::ConversionResolver) for how it
/// is folded into a USD table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    from: CurrencyCode,
    to: CurrencyCode,
    multiplier: f64,
}

impl RateRecord {
    /// Create a validated rate record
    ///
    /// Rejects self-rates and non-positive or non-finite multipliers.
    pub fn new(from: CurrencyCode, to: CurrencyCode, multiplier: f64) -> Result<Self> {
        if from == to {
            return Err(TradeError::MalformedData(format!(
                "Self-rate {}/{} is meaningless",
                from, to
            )));
        }
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(TradeError::MalformedData(format!(
                "FX rate must be positive, got {} for {}/{}",
                multiplier, from, to
            )));
        }
        Ok(Self {
            from,
            to,
            multiplier,
        })
    }

    /// Parse codes and build a record in one go
    pub fn parse(from: &str, to: &str, multiplier: f64) -> Result<Self> {
        Self::new(CurrencyCode::new(from)?, CurrencyCode::new(to)?, multiplier)
    }

    pub fn from(&self) -> &CurrencyCode {
        &self.from
    }

    pub fn to(&self) -> &CurrencyCode {
        &self.to
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl fmt::Display for RateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} x{}", self.from, self.to, self.multiplier)
    }
}

/// Anything that can produce a list of rate records
///
/// Sources load everything up front; there is no streaming or partial read.
pub trait RateSource {
    /// Human readable identifier used in errors and logs (usually a path)
    fn source_id(&self) -> String;

    /// Load every rate record, in document order
    fn load_rates(&self) -> Result<Vec<RateRecord>>;
}
