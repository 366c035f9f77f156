//! Output formatting for totals

use crate::error::{Result, TradeError};
use crate::finance::MonetaryTotal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// How a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `<dollars>.<cents>` lines
    #[default]
    Plain,
    /// A JSON document
    Json,
}

impl FromStr for ReportFormat {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(ReportFormat::Plain),
            "json" => Ok(ReportFormat::Json),
            other => Err(TradeError::ConfigError(format!(
                "Unknown report format: {}",
                other
            ))),
        }
    }
}

#[derive(Serialize)]
struct ItemTotal<'a> {
    item: &'a str,
    total: String,
    cents: i64,
}

/// Renders totals for printing
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Render the total for a single item
    pub fn render_total(&self, item: &str, total: MonetaryTotal) -> Result<String> {
        match self.format {
            ReportFormat::Plain => Ok(total.to_string()),
            ReportFormat::Json => Ok(serde_json::to_string(&ItemTotal {
                item,
                total: total.to_string(),
                cents: total.cents(),
            })?),
        }
    }

    /// Render one line (or JSON entry) per item
    pub fn render_totals(&self, totals: &BTreeMap<String, MonetaryTotal>) -> Result<String> {
        match self.format {
            ReportFormat::Plain => Ok(totals
                .iter()
                .map(|(item, total)| format!("{},{}", item, total))
                .collect::<Vec<_>>()
                .join("\n")),
            ReportFormat::Json => {
                let entries: Vec<ItemTotal<'_>> = totals
                    .iter()
                    .map(|(item, total)| ItemTotal {
                        item,
                        total: total.to_string(),
                        cents: total.cents(),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_total() {
        let reporter = Reporter::default();
        let line = reporter
            .render_total("DM1182", MonetaryTotal::from_cents(13405))
            .unwrap();
        assert_eq!(line, "134.05");
    }

    #[test]
    fn test_json_total() {
        let reporter = Reporter::new(ReportFormat::Json);
        let json = reporter
            .render_total("DM1182", MonetaryTotal::from_cents(2000))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["item"], "DM1182");
        assert_eq!(value["total"], "20.00");
        assert_eq!(value["cents"], 2000);
    }

    #[test]
    fn test_plain_totals_by_item() {
        let mut totals = BTreeMap::new();
        totals.insert("DM1210".to_string(), MonetaryTotal::from_cents(450));
        totals.insert("DM1182".to_string(), MonetaryTotal::from_cents(2000));

        let text = Reporter::default().render_totals(&totals).unwrap();
        assert_eq!(text, "DM1182,20.00\nDM1210,4.50");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("plain".parse::<ReportFormat>().unwrap(), ReportFormat::Plain);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
