//! Run configuration
//!
//! Loaded from TOML; every field has a default so an empty file (or no file
//! at all) reproduces the classic run: `RATES.xml` + `TRANS.csv`, item
//! `DM1182`.
//!
//! ```toml
//! rates_path = "data/RATES.xml"
//! transactions_path = "data/TRANS.csv"
//! item = "DM1182"
//!
//! [transactions]
//! item_column = "sku"
//! amount_column = "amount"
//!
//! [resolver]
//! conflict_tolerance = 1e-6
//! ```

use crate::conversion::resolver::DEFAULT_CONFLICT_TOLERANCE;
use crate::data::transactions::TransactionFormat;
use crate::error::{Result, TradeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Relative tolerance before a redundant rate is reported as conflicting
    pub conflict_tolerance: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            conflict_tolerance: DEFAULT_CONFLICT_TOLERANCE,
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeConfig {
    #[serde(default = "default_rates_path")]
    pub rates_path: PathBuf,
    #[serde(default = "default_transactions_path")]
    pub transactions_path: PathBuf,
    #[serde(default = "default_item")]
    pub item: String,
    #[serde(default)]
    pub transactions: TransactionFormat,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

fn default_rates_path() -> PathBuf {
    PathBuf::from("RATES.xml")
}

fn default_transactions_path() -> PathBuf {
    PathBuf::from("TRANS.csv")
}

fn default_item() -> String {
    "DM1182".to_string()
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            rates_path: default_rates_path(),
            transactions_path: default_transactions_path(),
            item: default_item(),
            transactions: TransactionFormat::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl TradeConfig {
    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the user config
    /// at `~/.rusty-trade/config.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::from_file(config_path),
            None => match Self::default_location() {
                Some(default_config) if default_config.exists() => {
                    log::debug!("Using config {}", default_config.display());
                    Self::from_file(&default_config)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TradeError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| TradeError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.item.trim().is_empty() {
            return Err(TradeError::ConfigError("item must not be empty".to_string()));
        }
        let tolerance = self.resolver.conflict_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(TradeError::ConfigError(format!(
                "conflict_tolerance must be a non-negative number, got {}",
                tolerance
            )));
        }
        Ok(())
    }

    fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".rusty-trade").join("config.toml"))
    }
}
