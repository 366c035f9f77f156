//! Currency -> USD conversion table

use crate::currency::CurrencyCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Value of USD in its own table; never stored as an entry
pub const USD_ANCHOR: f64 = 1.0;

/// Mapping from currency to "units of that currency per 1 USD"
///
/// USD is the implicit anchor: [`get`](Self::get) answers `1.0` for it but
/// it is never a key, so `len()` counts only currencies that needed
/// resolving. Entries are fixed once and never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionTable {
    rates: BTreeMap<CurrencyCode, f64>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of `currency` per 1 USD, if known
    pub fn get(&self, currency: &CurrencyCode) -> Option<f64> {
        if currency.is_usd() {
            return Some(USD_ANCHOR);
        }
        self.rates.get(currency).copied()
    }

    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        currency.is_usd() || self.rates.contains_key(currency)
    }

    /// Number of resolved currencies, USD excluded
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Resolved entries in currency order
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, value)| (code, *value))
    }

    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.keys()
    }

    /// Fix a currency's value. Returns false (and changes nothing) if the
    /// currency is USD or already fixed.
    pub(crate) fn fix(&mut self, currency: CurrencyCode, value: f64) -> bool {
        if currency.is_usd() || self.rates.contains_key(&currency) {
            return false;
        }
        self.rates.insert(currency, value);
        true
    }
}

impl fmt::Display for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (code, value)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", code, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    #[test]
    fn test_usd_is_implicit() {
        let table = ConversionTable::new();
        assert_eq!(table.get(&CurrencyCode::usd()), Some(1.0));
        assert!(table.contains(&CurrencyCode::usd()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_fix_is_first_wins() {
        let mut table = ConversionTable::new();
        assert!(table.fix(code("EUR"), 0.9));
        assert!(!table.fix(code("EUR"), 0.5));
        assert_eq!(table.get(&code("EUR")), Some(0.9));
    }

    #[test]
    fn test_usd_never_stored() {
        let mut table = ConversionTable::new();
        assert!(!table.fix(CurrencyCode::usd(), 2.0));
        assert_eq!(table.len(), 0);
        assert_eq!(table.get(&CurrencyCode::usd()), Some(1.0));
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut table = ConversionTable::new();
        table.fix(code("JPY"), 150.0);
        table.fix(code("EUR"), 0.9);

        let codes: Vec<_> = table.currencies().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["EUR", "JPY"]);
        assert_eq!(table.to_string(), "{EUR: 0.9, JPY: 150}");
    }
}
