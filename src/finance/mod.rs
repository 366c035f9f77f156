//! Sales totals in the reference currency

pub mod ledger;
pub mod money;

pub use ledger::{parse_amount, sum, LedgerAggregator};
pub use money::MonetaryTotal;
