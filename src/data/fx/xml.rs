//! XML rate document reader
//!
//! Reads documents of the form
//!
//! ```xml
//! <rates>
//!   <rate><from>AUD</from><to>CAD</to><conversion>1.0079</conversion></rate>
//!   <rate><from>CAD</from><to>USD</to><conversion>1.0090</conversion></rate>
//! </rates>
//! ```

use super::base::{RateRecord, RateSource};
use crate::error::{Result, TradeError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RatesDocument {
    #[serde(rename = "rate", default)]
    rates: Vec<RawRate>,
}

#[derive(Debug, Deserialize)]
struct RawRate {
    from: String,
    to: String,
    conversion: f64,
}

/// Rate source backed by an XML file
#[derive(Debug, Clone)]
pub struct XmlRateSource {
    path: PathBuf,
}

impl XmlRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an XML rate document held in memory
    pub fn parse_str(xml: &str) -> Result<Vec<RateRecord>> {
        let document: RatesDocument = quick_xml::de::from_str(xml)
            .map_err(|e| TradeError::MalformedData(format!("Invalid rate document: {}", e)))?;

        document
            .rates
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                RateRecord::parse(&raw.from, &raw.to, raw.conversion).map_err(|e| {
                    TradeError::MalformedData(format!("Rate entry {}: {}", idx + 1, e))
                })
            })
            .collect()
    }
}

impl RateSource for XmlRateSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    fn load_rates(&self) -> Result<Vec<RateRecord>> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| TradeError::unavailable(self.source_id(), e))?;
        let rates = Self::parse_str(&contents)?;
        log::debug!("Loaded {} rates from {}", rates.len(), self.source_id());
        Ok(rates)
    }
}
