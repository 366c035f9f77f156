//! In-memory rate source
//!
//! Holds rate records directly, either added one by one or loaded from
//! `from,to,multiplier` CSV text. Handy for tests and for rate files that
//! were exported from a spreadsheet rather than the XML feed.

use super::base::{RateRecord, RateSource};
use crate::currency::CurrencyCode;
use crate::error::{Result, TradeError};
use std::fs;
use std::path::Path;

/// In-memory rate storage
///
/// # Example
/// ```
/// use rusty_trade::data::fx::{InMemoryRateSource, RateSource};
///
/// let mut source = InMemoryRateSource::new();
/// source.add_rate("EUR", "USD", 0.9).unwrap();
/// source.add_rate("GBP", "EUR", 1.15).unwrap();
///
/// assert_eq!(source.load_rates().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateSource {
    name: String,
    rates: Vec<RateRecord>,
}

impl InMemoryRateSource {
    pub fn new() -> Self {
        Self {
            name: "in-memory".to_string(),
            rates: Vec::new(),
        }
    }

    /// Wrap records that were built elsewhere
    pub fn from_records(rates: Vec<RateRecord>) -> Self {
        Self {
            name: "in-memory".to_string(),
            rates,
        }
    }

    /// Read a CSV rate file into memory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TradeError::unavailable(path.display().to_string(), e))?;
        let mut source = Self {
            name: path.display().to_string(),
            rates: Vec::new(),
        };
        source.load_from_csv(&contents)?;
        Ok(source)
    }

    /// Add a single rate
    pub fn add_rate(&mut self, from: &str, to: &str, multiplier: f64) -> Result<()> {
        self.rates.push(RateRecord::parse(from, to, multiplier)?);
        Ok(())
    }

    /// Load rates from CSV data
    ///
    /// Expected format: from_currency,to_currency,multiplier. Blank lines and
    /// `#` comments are skipped, as is a leading header row.
    pub fn load_from_csv(&mut self, csv_data: &str) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut entries = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| TradeError::MalformedData(format!("Invalid rate CSV: {}", e)))?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 1);

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            if record.len() != 3 {
                return Err(TradeError::MalformedData(format!(
                    "Invalid CSV format at line {}: expected 3 columns, got {}",
                    line,
                    record.len()
                )));
            }
            if idx == 0 && record[0].eq_ignore_ascii_case("from") {
                continue;
            }

            let from = CurrencyCode::new(&record[0])?;
            let to = CurrencyCode::new(&record[1])?;
            let multiplier: f64 = record[2].parse().map_err(|e| {
                TradeError::MalformedData(format!("Invalid rate at line {}: {}", line, e))
            })?;

            entries.push(RateRecord::new(from, to, multiplier)?);
        }

        let count = entries.len();
        self.rates.extend(entries);
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn clear(&mut self) {
        self.rates.clear();
    }
}

impl RateSource for InMemoryRateSource {
    fn source_id(&self) -> String {
        self.name.clone()
    }

    fn load_rates(&self) -> Result<Vec<RateRecord>> {
        Ok(self.rates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rate() {
        let mut source = InMemoryRateSource::new();
        source.add_rate("EUR", "USD", 0.9).unwrap();

        let rates = source.load_rates().unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].multiplier(), 0.9);
    }

    #[test]
    fn test_invalid_rate() {
        let mut source = InMemoryRateSource::new();
        assert!(source.add_rate("EUR", "USD", -1.0).is_err());
        assert!(source.add_rate("EUR", "USD", 0.0).is_err());
        assert!(source.is_empty());
    }

    #[test]
    fn test_load_from_csv() {
        let data = "from,to,multiplier\n\
                    # quoted by desk\n\
                    EUR,USD,0.9\n\
                    \n\
                    GBP, EUR , 1.15\n";
        let mut source = InMemoryRateSource::new();
        let count = source.load_from_csv(data).unwrap();

        assert_eq!(count, 2);
        let rates = source.load_rates().unwrap();
        assert_eq!(rates[1].from(), "GBP");
        assert_eq!(rates[1].to(), "EUR");
    }

    #[test]
    fn test_load_from_csv_wrong_columns() {
        let mut source = InMemoryRateSource::new();
        let err = source.load_from_csv("EUR,USD\n").unwrap_err();
        assert!(err.to_string().contains("expected 3 columns"));
    }

    #[test]
    fn test_load_from_csv_bad_rate() {
        let mut source = InMemoryRateSource::new();
        assert!(source.load_from_csv("EUR,USD,lots\n").is_err());
        assert!(source.load_from_csv("EUR,USD,-2\n").is_err());
    }

    #[test]
    fn test_clear() {
        let mut source = InMemoryRateSource::new();
        source.add_rate("JPY", "USD", 150.0).unwrap();
        assert_eq!(source.len(), 1);

        source.clear();
        assert_eq!(source.len(), 0);
    }
}
