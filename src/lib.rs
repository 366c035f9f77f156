//! # rusty-trade
//!
//! Turns a bag of pairwise exchange rates into a single currency -> USD
//! table, then totals a multi-currency sales ledger in USD.
//!
//! Rates may quote any pair, in any order; the
//! [`ConversionResolver`](conversion::ConversionResolver) keeps sweeping
//! until every currency reachable from USD is fixed.
//!
//! ## Example
//!
//! ```rust
//! use rusty_trade::prelude::*;
//!
//! let rates = vec![
//!     RateRecord::parse("GBP", "EUR", 1.15).unwrap(),
//!     RateRecord::parse("EUR", "USD", 0.9).unwrap(),
//! ];
//! let table = ConversionResolver::new().resolve(&rates);
//!
//! let sales = vec![
//!     TransactionRecord::from_amount_field("DM1182", "10.00 USD").unwrap(),
//!     TransactionRecord::from_amount_field("DM1182", "9.00 EUR").unwrap(),
//! ];
//! let total = LedgerAggregator::new(&table).sum(&sales, "DM1182").unwrap();
//! assert_eq!(total.to_string(), "20.00");
//! ```

pub mod config;
pub mod conversion;
pub mod currency;
pub mod data;
pub mod engine;
pub mod error;
pub mod finance;
pub mod report;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::TradeConfig;
    pub use crate::conversion::{ConversionResolver, ConversionTable, ResolutionReport};
    pub use crate::currency::CurrencyCode;
    pub use crate::data::fx::{RateRecord, RateSource};
    pub use crate::data::transactions::TransactionRecord;
    pub use crate::engine::TradeEngine;
    pub use crate::error::{Result, TradeError};
    pub use crate::finance::{LedgerAggregator, MonetaryTotal};
    pub use crate::report::{ReportFormat, Reporter};
}
