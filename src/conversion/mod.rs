//! Conversion of arbitrary currencies into USD
//!
//! - **table**: the resolved currency -> units-per-USD mapping
//! - **resolver**: fixed-point closure that builds the table from pairwise rates

pub mod resolver;
pub mod table;

pub use resolver::{resolve, ConversionResolver, RateConflict, ResolutionReport};
pub use table::ConversionTable;
