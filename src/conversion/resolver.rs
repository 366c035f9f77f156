//! Rate resolution - fold pairwise rates into a single USD table
//!
//! Rates arrive as an unordered list of quotes between arbitrary pairs.
//! The resolver repeatedly sweeps the unresolved records, fixing any
//! currency that can be reached from one already in the table (USD counts
//! as always present). A record `{from, to, m}` fixes
//!
//! - `table[from] = table[to] * m` when `to` is known, or
//! - `table[to] = table[from] / m` when `from` is known.
//!
//! Sweeps stop as soon as one fixes nothing new. Each productive sweep
//! fixes at least one currency, so the loop runs at most once per distinct
//! currency plus a final unproductive sweep. Whatever is still pending then
//! has no path to USD and is left out of the table.

use super::table::ConversionTable;
use crate::currency::CurrencyCode;
use crate::data::fx::RateRecord;
use serde::Serialize;

/// Default relative tolerance when checking redundant rates for consistency
pub const DEFAULT_CONFLICT_TOLERANCE: f64 = 1e-9;

/// A redundant record whose implied value disagrees with the fixed one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateConflict {
    pub currency: CurrencyCode,
    /// Value already in the table (kept)
    pub fixed: f64,
    /// Value this record would have produced (discarded)
    pub implied: f64,
    pub record: String,
}

impl RateConflict {
    /// Relative difference between the two values
    pub fn deviation(&self) -> f64 {
        ((self.implied - self.fixed) / self.fixed).abs()
    }
}

/// Table plus everything learned while building it
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub table: ConversionTable,
    /// Number of sweeps over the pending records
    pub passes: usize,
    /// Records that never touched a resolved currency
    pub unresolved: Vec<RateRecord>,
    pub conflicts: Vec<RateConflict>,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Currencies mentioned by unresolved records, deduplicated and sorted
    pub fn disconnected_currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self
            .unresolved
            .iter()
            .flat_map(|r| [r.from().clone(), r.to().clone()])
            .filter(|c| !self.table.contains(c))
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

/// What a single record did to the table
#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// Fixed a new currency
    Fixed(CurrencyCode, f64),
    /// Both ends already known; nothing to add
    Redundant,
    /// Neither end known yet
    Deferred,
}

/// Builds a [`ConversionTable`] from pairwise rates
///
/// # Example
/// ```
/// use rusty_trade::conversion::ConversionResolver;
/// use rusty_trade::currency::CurrencyCode;
/// use rusty_trade::data::fx::RateRecord;
///
/// // GBP only becomes reachable after EUR is fixed
/// let rates = vec![
///     RateRecord::parse("GBP", "EUR", 1.15).unwrap(),
///     RateRecord::parse("EUR", "USD", 0.9).unwrap(),
/// ];
/// let table = ConversionResolver::new().resolve(&rates);
///
/// let gbp = table.get(&CurrencyCode::new("GBP").unwrap()).unwrap();
/// assert!((gbp - 1.035).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ConversionResolver {
    conflict_tolerance: f64,
}

impl ConversionResolver {
    pub fn new() -> Self {
        Self {
            conflict_tolerance: DEFAULT_CONFLICT_TOLERANCE,
        }
    }

    /// Relative tolerance used when flagging redundant rates as conflicting
    pub fn with_conflict_tolerance(conflict_tolerance: f64) -> Self {
        Self {
            conflict_tolerance: conflict_tolerance.abs(),
        }
    }

    pub fn conflict_tolerance(&self) -> f64 {
        self.conflict_tolerance
    }

    /// Resolve every reachable currency. Never fails; unreachable currencies
    /// are simply absent.
    pub fn resolve(&self, records: &[RateRecord]) -> ConversionTable {
        self.resolve_with_report(records).table
    }

    /// Resolve and keep the diagnostics
    pub fn resolve_with_report(&self, records: &[RateRecord]) -> ResolutionReport {
        let mut table = ConversionTable::new();
        let mut conflicts = Vec::new();
        let mut pending: Vec<&RateRecord> = records.iter().collect();
        let mut passes = 0;

        while !pending.is_empty() {
            passes += 1;
            let mut progressed = false;
            let mut deferred = Vec::new();

            for record in pending {
                match Self::step(&table, record) {
                    Step::Fixed(currency, value) => {
                        log::debug!("Pass {}: {} = {} per USD (via {})", passes, currency, value, record);
                        table.fix(currency, value);
                        progressed = true;
                    }
                    Step::Redundant => {
                        if let Some(conflict) = self.check_consistency(&table, record) {
                            log::warn!(
                                "Conflicting rate {} ignored: implies {} = {}, already fixed at {}",
                                conflict.record,
                                conflict.currency,
                                conflict.implied,
                                conflict.fixed
                            );
                            conflicts.push(conflict);
                        }
                    }
                    Step::Deferred => deferred.push(record),
                }
            }

            pending = deferred;
            if !progressed {
                break;
            }
        }

        for record in &pending {
            log::warn!("Rate {} has no path to USD; dropped", record);
        }
        log::debug!(
            "Resolved {} currencies in {} passes ({} unresolved rates)",
            table.len(),
            passes,
            pending.len()
        );

        ResolutionReport {
            table,
            passes,
            unresolved: pending.into_iter().cloned().collect(),
            conflicts,
        }
    }

    /// Try to fix one new currency from a record given the current table
    fn step(table: &ConversionTable, record: &RateRecord) -> Step {
        let from = table.get(record.from());
        let to = table.get(record.to());

        match (from, to) {
            (Some(_), Some(_)) => Step::Redundant,
            (None, Some(to_value)) => {
                Step::Fixed(record.from().clone(), to_value * record.multiplier())
            }
            (Some(from_value), None) => {
                Step::Fixed(record.to().clone(), from_value / record.multiplier())
            }
            (None, None) => Step::Deferred,
        }
    }

    /// Compare a redundant record against the values already fixed
    fn check_consistency(&self, table: &ConversionTable, record: &RateRecord) -> Option<RateConflict> {
        // Self-rates are rejected at ingestion but carry no information anyway
        if record.from() == record.to() {
            return None;
        }
        let from_value = table.get(record.from())?;
        let to_value = table.get(record.to())?;

        // Report against whichever side is a real table entry
        let (currency, fixed, implied) = if record.from().is_usd() {
            (record.to().clone(), to_value, from_value / record.multiplier())
        } else {
            (record.from().clone(), from_value, to_value * record.multiplier())
        };

        let conflict = RateConflict {
            currency,
            fixed,
            implied,
            record: record.to_string(),
        };
        (conflict.deviation() > self.conflict_tolerance).then_some(conflict)
    }
}

impl Default for ConversionResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with default settings
pub fn resolve(records: &[RateRecord]) -> ConversionTable {
    ConversionResolver::new().resolve(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rate(from: &str, to: &str, multiplier: f64) -> RateRecord {
        RateRecord::parse(from, to, multiplier).unwrap()
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    #[test]
    fn test_direct_to_usd() {
        let table = resolve(&[rate("EUR", "USD", 0.9)]);
        assert_eq!(table.get(&code("EUR")), Some(0.9));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_direct_from_usd() {
        let table = resolve(&[rate("USD", "JPY", 0.5)]);
        assert_relative_eq!(table.get(&code("JPY")).unwrap(), 2.0);
    }

    #[test]
    fn test_transitive_in_order() {
        let table = resolve(&[rate("EUR", "USD", 0.9), rate("GBP", "EUR", 1.15)]);
        assert_relative_eq!(table.get(&code("EUR")).unwrap(), 0.9);
        assert_relative_eq!(table.get(&code("GBP")).unwrap(), 1.035, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_order_needs_second_pass() {
        let report = ConversionResolver::new()
            .resolve_with_report(&[rate("GBP", "EUR", 1.15), rate("EUR", "USD", 0.9)]);

        assert_eq!(report.passes, 2);
        assert!(report.is_complete());
        assert_relative_eq!(report.table.get(&code("GBP")).unwrap(), 1.035, epsilon = 1e-12);
    }

    #[test]
    fn test_known_from_side_divides() {
        // CAD known, record quotes CAD against AUD
        let table = resolve(&[rate("CAD", "USD", 1.25), rate("CAD", "AUD", 0.5)]);
        assert_relative_eq!(table.get(&code("AUD")).unwrap(), 2.5);
    }

    #[test]
    fn test_long_reversed_chain() {
        // C1 -> C2 -> ... -> USD supplied back to front
        let codes = ["AAA", "BBB", "CCC", "DDD", "EEE"];
        let mut rates = vec![rate("EEE", "USD", 2.0)];
        for pair in codes.windows(2).rev() {
            rates.push(rate(pair[0], pair[1], 2.0));
        }
        rates.reverse();

        let report = ConversionResolver::new().resolve_with_report(&rates);
        assert!(report.is_complete());
        assert_eq!(report.table.len(), 5);
        assert_relative_eq!(report.table.get(&code("AAA")).unwrap(), 32.0);
        assert!(report.passes <= codes.len() + 1);
    }

    #[test]
    fn test_disconnected_currency_is_absent() {
        let report = ConversionResolver::new()
            .resolve_with_report(&[rate("EUR", "USD", 0.9), rate("XAU", "XAG", 80.0)]);

        assert!(report.table.get(&code("XAU")).is_none());
        assert!(report.table.get(&code("XAG")).is_none());
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(
            report.disconnected_currencies(),
            vec![code("XAG"), code("XAU")]
        );
    }

    #[test]
    fn test_no_progress_stops_after_one_pass() {
        let report = ConversionResolver::new()
            .resolve_with_report(&[rate("XAU", "XAG", 80.0), rate("XAG", "XPT", 0.1)]);

        assert_eq!(report.passes, 1);
        assert!(report.table.is_empty());
        assert_eq!(report.unresolved.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let report = ConversionResolver::new().resolve_with_report(&[]);
        assert_eq!(report.passes, 0);
        assert!(report.table.is_empty());
    }

    #[test]
    fn test_first_wins_on_conflict() {
        let report = ConversionResolver::new()
            .resolve_with_report(&[rate("EUR", "USD", 0.9), rate("EUR", "USD", 0.8)]);

        assert_eq!(report.table.get(&code("EUR")), Some(0.9));
        assert_eq!(report.conflicts.len(), 1);
        let conflict = &report.conflicts[0];
        assert_eq!(conflict.currency, code("EUR"));
        assert_eq!(conflict.fixed, 0.9);
        assert_eq!(conflict.implied, 0.8);
    }

    #[test]
    fn test_consistent_redundant_rate_is_not_a_conflict() {
        let report = ConversionResolver::new().resolve_with_report(&[
            rate("EUR", "USD", 0.5),
            rate("USD", "EUR", 2.0),
            rate("GBP", "EUR", 2.0),
            rate("GBP", "USD", 1.0),
        ]);

        assert!(report.conflicts.is_empty());
        assert_relative_eq!(report.table.get(&code("GBP")).unwrap(), 1.0);
    }

    #[test]
    fn test_conflict_from_usd_side() {
        let report = ConversionResolver::new()
            .resolve_with_report(&[rate("JPY", "USD", 150.0), rate("USD", "JPY", 0.01)]);

        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].currency, code("JPY"));
        assert_relative_eq!(report.conflicts[0].implied, 100.0);
    }

    #[test]
    fn test_conflict_tolerance() {
        let rates = [rate("EUR", "USD", 0.9), rate("EUR", "USD", 0.9001)];

        let strict = ConversionResolver::new().resolve_with_report(&rates);
        assert_eq!(strict.conflicts.len(), 1);

        let loose = ConversionResolver::with_conflict_tolerance(1e-3).resolve_with_report(&rates);
        assert!(loose.conflicts.is_empty());
    }

    #[test]
    fn test_round_trip_identity() {
        let forward = resolve(&[rate("CHF", "USD", 0.88)]);
        let backward = resolve(&[rate("USD", "CHF", 1.0 / 0.88)]);

        assert_relative_eq!(
            forward.get(&code("CHF")).unwrap(),
            backward.get(&code("CHF")).unwrap(),
            max_relative = 1e-12
        );
    }
}
