//! Ledger aggregation - convert sales to USD cents and total them
//!
//! Amounts are parsed as exact decimals and converted with decimal
//! arithmetic; only the final per-sale USD value is rounded (half to even)
//! to whole cents. Totals are plain integer sums of those cents.

use super::money::MonetaryTotal;
use crate::conversion::ConversionTable;
use crate::data::transactions::TransactionRecord;
use crate::error::{Result, TradeError};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Parse a decimal amount such as `"19.99"`
pub fn parse_amount(text: &str) -> Result<Decimal> {
    Decimal::from_str(text.trim()).map_err(|e| TradeError::MalformedAmount {
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// Sums transactions in USD using a resolved conversion table
#[derive(Debug, Clone, Copy)]
pub struct LedgerAggregator<'a> {
    table: &'a ConversionTable,
}

impl<'a> LedgerAggregator<'a> {
    pub fn new(table: &'a ConversionTable) -> Self {
        Self { table }
    }

    /// Value of one transaction in USD cents
    pub fn to_cents(&self, transaction: &TransactionRecord) -> Result<i64> {
        let amount = parse_amount(&transaction.amount)?;

        let usd = if transaction.currency.is_usd() {
            amount
        } else {
            let per_usd = self.table.get(&transaction.currency).ok_or_else(|| {
                TradeError::UnknownCurrency {
                    currency: transaction.currency.to_string(),
                }
            })?;
            let per_usd = Decimal::from_f64(per_usd)
                .filter(|rate| !rate.is_zero())
                .ok_or_else(|| {
                    TradeError::Arithmetic(format!(
                        "Rate {} for {} is not representable",
                        per_usd, transaction.currency
                    ))
                })?;
            amount.checked_div(per_usd).ok_or_else(|| {
                TradeError::Arithmetic(format!(
                    "Converting {} {} overflowed",
                    transaction.amount, transaction.currency
                ))
            })?
        };

        usd.checked_mul(Decimal::from(100))
            .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
            .and_then(|cents| cents.to_i64())
            .ok_or_else(|| {
                TradeError::Arithmetic(format!(
                    "{} {} does not fit in a cent total",
                    transaction.amount, transaction.currency
                ))
            })
    }

    /// Total USD sales of one item
    ///
    /// Fails on the first sale whose currency is missing from the table or
    /// whose amount does not parse; a partial total is never returned.
    pub fn sum(&self, transactions: &[TransactionRecord], item: &str) -> Result<MonetaryTotal> {
        let mut total = MonetaryTotal::ZERO;
        let mut matched = 0usize;

        for transaction in transactions.iter().filter(|t| t.item == item) {
            let cents = self.to_cents(transaction)?;
            log::debug!(
                "{} {} {} -> {} cents",
                transaction.item,
                transaction.amount,
                transaction.currency,
                cents
            );
            total = total.checked_add_cents(cents)?;
            matched += 1;
        }

        log::info!("{} sales of {} totalling {} USD", matched, item, total);
        Ok(total)
    }

    /// Total USD sales for every item in the ledger
    pub fn totals_by_item(
        &self,
        transactions: &[TransactionRecord],
    ) -> Result<BTreeMap<String, MonetaryTotal>> {
        let mut totals: BTreeMap<String, MonetaryTotal> = BTreeMap::new();

        for transaction in transactions {
            let cents = self.to_cents(transaction)?;
            let entry = totals.entry(transaction.item.clone()).or_default();
            *entry = entry.checked_add_cents(cents)?;
        }

        Ok(totals)
    }
}

/// Total USD sales of `item` using `table`
pub fn sum(
    transactions: &[TransactionRecord],
    item: &str,
    table: &ConversionTable,
) -> Result<MonetaryTotal> {
    LedgerAggregator::new(table).sum(transactions, item)
}
