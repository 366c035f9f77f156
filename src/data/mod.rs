//! Input data: exchange rates and sales transactions

pub mod fx;
pub mod transactions;

pub use fx::{open_rate_source, RateRecord, RateSource};
pub use transactions::{CsvTransactionSource, TransactionFormat, TransactionRecord};
