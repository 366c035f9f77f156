//! Sales transaction loading from CSV files

use crate::currency::CurrencyCode;
use crate::error::{Result, TradeError};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One sale: an item, the amount as written, and the currency it was paid in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Store the sale happened at, when the file carries one
    pub store: Option<String>,
    /// Item identifier (SKU)
    pub item: String,
    /// Decimal amount exactly as it appeared in the source
    pub amount: String,
    pub currency: CurrencyCode,
}

impl TransactionRecord {
    pub fn new(item: impl Into<String>, amount: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            store: None,
            item: item.into(),
            amount: amount.into(),
            currency,
        }
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Build a record from an amount field such as `"19.99 EUR"`
    pub fn from_amount_field(item: impl Into<String>, field: &str) -> Result<Self> {
        let (amount, currency) = split_amount_field(field)?;
        Ok(Self::new(item, amount, currency))
    }
}

/// Split `"<decimal> <CODE>"` into its two halves
///
/// The decimal text is not validated here; the ledger does that so a bad
/// number surfaces as `MalformedAmount` rather than a structural error.
pub fn split_amount_field(field: &str) -> Result<(String, CurrencyCode)> {
    let (amount, code) = field.trim().split_once(' ').ok_or_else(|| {
        TradeError::MalformedData(format!(
            "Amount field '{}' is not '<amount> <currency>'",
            field
        ))
    })?;

    if amount.is_empty() {
        return Err(TradeError::MalformedData(format!(
            "Amount field '{}' has no amount",
            field
        )));
    }

    Ok((amount.to_string(), CurrencyCode::new(code)?))
}

/// CSV layout of a transaction file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFormat {
    /// Item identifier column name
    pub item_column: String,
    /// Amount column name (`"<decimal> <CODE>"`)
    pub amount_column: String,
    /// Optional store column name
    pub store_column: Option<String>,
    /// Has header row. Without one, columns are positional: store, item, amount
    pub has_headers: bool,
}

impl Default for TransactionFormat {
    fn default() -> Self {
        Self {
            item_column: "sku".to_string(),
            amount_column: "amount".to_string(),
            store_column: Some("store".to_string()),
            has_headers: true,
        }
    }
}

struct ColumnIndices {
    store: Option<usize>,
    item: usize,
    amount: usize,
}

/// CSV transaction reader
#[derive(Debug, Clone)]
pub struct CsvTransactionSource {
    path: PathBuf,
    format: TransactionFormat,
}

impl CsvTransactionSource {
    /// Create new CSV reader with default format
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: TransactionFormat::default(),
        }
    }

    /// Create with custom format
    pub fn with_format(path: impl Into<PathBuf>, format: TransactionFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every transaction in the file
    pub fn load(&self) -> Result<Vec<TransactionRecord>> {
        let file = File::open(&self.path)
            .map_err(|e| TradeError::unavailable(self.path.display().to_string(), e))?;
        let records = Self::parse_reader(file, &self.format)?;
        log::debug!(
            "Loaded {} transactions from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Parse transactions from any reader
    pub fn parse_reader<R: Read>(reader: R, format: &TransactionFormat) -> Result<Vec<TransactionRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(format.has_headers)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = if format.has_headers {
            let headers = rdr
                .headers()
                .map_err(|e| TradeError::MalformedData(format!("Failed to read headers: {}", e)))?
                .clone();
            ColumnIndices {
                store: match &format.store_column {
                    Some(name) => Some(Self::find_column(&headers, name)?),
                    None => None,
                },
                item: Self::find_column(&headers, &format.item_column)?,
                amount: Self::find_column(&headers, &format.amount_column)?,
            }
        } else {
            ColumnIndices {
                store: Some(0),
                item: 1,
                amount: 2,
            }
        };

        let mut transactions = Vec::new();
        for result in rdr.records() {
            let record = result
                .map_err(|e| TradeError::MalformedData(format!("Failed to read record: {}", e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let item = record.get(columns.item).ok_or_else(|| {
                TradeError::MalformedData(format!("Missing item at line {}", line))
            })?;
            let field = record.get(columns.amount).ok_or_else(|| {
                TradeError::MalformedData(format!("Missing amount at line {}", line))
            })?;

            let (amount, currency) = split_amount_field(field).map_err(|e| {
                TradeError::MalformedData(format!("Line {}: {}", line, e))
            })?;

            let mut transaction = TransactionRecord::new(item, amount, currency);
            if let Some(store_idx) = columns.store {
                transaction.store = record.get(store_idx).map(str::to_string);
            }
            transactions.push(transaction);
        }

        Ok(transactions)
    }

    /// Parse transactions held in a string
    pub fn parse_str(data: &str, format: &TransactionFormat) -> Result<Vec<TransactionRecord>> {
        Self::parse_reader(data.as_bytes(), format)
    }

    /// Find column index by name
    fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| TradeError::MalformedData(format!("Column '{}' not found", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "store,sku,amount\n\
                          Yonkers,DM1210,70.00 USD\n\
                          Yonkers,DM1182,19.68 AUD\n\
                          Nashua,DM1182,58.58 AUD\n";

    #[test]
    fn test_split_amount_field() {
        let (amount, currency) = split_amount_field("19.99 EUR").unwrap();
        assert_eq!(amount, "19.99");
        assert_eq!(currency, "EUR");
    }

    #[test]
    fn test_split_amount_field_rejects_shape() {
        assert!(split_amount_field("19.99").is_err());
        assert!(split_amount_field("19.99 EURO").is_err());
        assert!(split_amount_field("").is_err());
    }

    #[test]
    fn test_parse_with_headers() {
        let records =
            CsvTransactionSource::parse_str(SAMPLE, &TransactionFormat::default()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].store.as_deref(), Some("Yonkers"));
        assert_eq!(records[1].item, "DM1182");
        assert_eq!(records[1].amount, "19.68");
        assert_eq!(records[1].currency, "AUD");
    }

    #[test]
    fn test_parse_without_headers_is_positional() {
        let format = TransactionFormat {
            has_headers: false,
            ..TransactionFormat::default()
        };
        let records =
            CsvTransactionSource::parse_str("Nashua,DM1182,9.00 EUR\n", &format).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].store.as_deref(), Some("Nashua"));
        assert_eq!(records[0].item, "DM1182");
    }

    #[test]
    fn test_missing_column() {
        let format = TransactionFormat {
            item_column: "product".to_string(),
            ..TransactionFormat::default()
        };
        let err = CsvTransactionSource::parse_str(SAMPLE, &format).unwrap_err();
        assert!(err.to_string().contains("Column 'product' not found"));
    }

    #[test]
    fn test_bad_amount_field_is_malformed_data() {
        let data = "store,sku,amount\nYonkers,DM1182,19.68\n";
        let err = CsvTransactionSource::parse_str(data, &TransactionFormat::default()).unwrap_err();
        assert!(matches!(err, TradeError::MalformedData(_)));
    }

    #[test]
    fn test_amount_text_kept_verbatim() {
        // Parsing the number is the ledger's job
        let data = "store,sku,amount\nYonkers,DM1182,abc USD\n";
        let records = CsvTransactionSource::parse_str(data, &TransactionFormat::default()).unwrap();
        assert_eq!(records[0].amount, "abc");
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvTransactionSource::new(file.path());
        assert_eq!(source.load().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let source = CsvTransactionSource::new("/nowhere/TRANS.csv");
        assert!(matches!(
            source.load(),
            Err(TradeError::SourceUnavailable { .. })
        ));
    }
}
