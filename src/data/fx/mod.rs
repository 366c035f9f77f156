//! Exchange rate sources
//!
//! # Components
//!
//! - **base**: `RateRecord` and the `RateSource` trait
//! - **xml**: reader for the `<rates>` XML feed
//! - **in_memory**: in-memory records, also loadable from CSV text
//!
//! # Example
//!
//! ```rust
//! use rusty_trade::data::fx::XmlRateSource;
//!
//! let rates = XmlRateSource::parse_str(
//!     "<rates><rate><from>EUR</from><to>USD</to><conversion>0.9</conversion></rate></rates>",
//! )
//! .unwrap();
//! assert_eq!(rates[0].from(), "EUR");
//! ```

pub mod base;
pub mod in_memory;
pub mod xml;

pub use base::{RateRecord, RateSource};
pub use in_memory::InMemoryRateSource;
pub use xml::XmlRateSource;

use crate::error::{Result, TradeError};
use std::path::Path;

/// Pick a rate source from the file extension (`.xml` or `.csv`)
pub fn open_rate_source(path: &Path) -> Result<Box<dyn RateSource>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("xml") => Ok(Box::new(XmlRateSource::new(path))),
        Some("csv") => Ok(Box::new(InMemoryRateSource::from_csv_path(path)?)),
        _ => Err(TradeError::ConfigError(format!(
            "Unsupported rate file type: {} (expected .xml or .csv)",
            path.display()
        ))),
    }
}
