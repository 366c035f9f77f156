//! End-to-end run: rates -> conversion table -> sales total

use crate::config::TradeConfig;
use crate::conversion::{ConversionResolver, ConversionTable, ResolutionReport};
use crate::data::fx::{open_rate_source, RateRecord};
use crate::data::transactions::{CsvTransactionSource, TransactionRecord};
use crate::error::Result;
use crate::finance::{LedgerAggregator, MonetaryTotal};
use std::collections::BTreeMap;

/// Outcome of a single-item run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub item: String,
    pub total: MonetaryTotal,
    /// Currencies resolved, USD excluded
    pub currencies: usize,
    pub unresolved_rates: usize,
    pub conflicts: usize,
    pub passes: usize,
}

/// Runs the pipeline described by a [`TradeConfig`]
///
/// Every stage fails fast: an unreadable or malformed source, or a sale in a
/// currency the rates never reach, aborts the run with no partial result.
pub struct TradeEngine {
    config: TradeConfig,
    resolver: ConversionResolver,
}

impl TradeEngine {
    pub fn new(config: TradeConfig) -> Self {
        let resolver =
            ConversionResolver::with_conflict_tolerance(config.resolver.conflict_tolerance);
        Self { config, resolver }
    }

    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// Read the configured rate file
    pub fn load_rates(&self) -> Result<Vec<RateRecord>> {
        let source = open_rate_source(&self.config.rates_path)?;
        let rates = source.load_rates()?;
        log::info!("Loaded {} rates from {}", rates.len(), source.source_id());
        Ok(rates)
    }

    /// Build the conversion table from rates
    pub fn resolve(&self, rates: &[RateRecord]) -> ResolutionReport {
        let report = self.resolver.resolve_with_report(rates);
        log::info!(
            "Conversion table: {} currencies in {} passes",
            report.table.len(),
            report.passes
        );
        log::debug!("Conversion table: {}", report.table);
        if !report.is_complete() {
            log::warn!(
                "No path to USD for: {}",
                report
                    .disconnected_currencies()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        report
    }

    /// Read the configured transaction file
    pub fn load_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let source = CsvTransactionSource::with_format(
            &self.config.transactions_path,
            self.config.transactions.clone(),
        );
        let transactions = source.load()?;
        log::info!(
            "Loaded {} transactions from {}",
            transactions.len(),
            source.path().display()
        );
        Ok(transactions)
    }

    /// Load rates and resolve them
    pub fn conversion_table(&self) -> Result<ResolutionReport> {
        let rates = self.load_rates()?;
        Ok(self.resolve(&rates))
    }

    /// Total sales of the configured item in USD
    pub fn run(&self) -> Result<RunSummary> {
        let report = self.conversion_table()?;
        let transactions = self.load_transactions()?;

        let total = LedgerAggregator::new(&report.table).sum(&transactions, &self.config.item)?;

        Ok(RunSummary {
            item: self.config.item.clone(),
            total,
            currencies: report.table.len(),
            unresolved_rates: report.unresolved.len(),
            conflicts: report.conflicts.len(),
            passes: report.passes,
        })
    }

    /// Total sales of every item in USD
    pub fn run_all_items(&self) -> Result<BTreeMap<String, MonetaryTotal>> {
        let report = self.conversion_table()?;
        let transactions = self.load_transactions()?;
        Self::totals(&report.table, &transactions)
    }

    fn totals(
        table: &ConversionTable,
        transactions: &[TransactionRecord],
    ) -> Result<BTreeMap<String, MonetaryTotal>> {
        let totals = LedgerAggregator::new(table).totals_by_item(transactions)?;
        log::info!("Totalled {} items", totals.len());
        Ok(totals)
    }
}
