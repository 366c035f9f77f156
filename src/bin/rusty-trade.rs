//! rusty-trade CLI - total sales of an item in USD
//!
//! ## Example Usage
//!
//! ```bash
//! # RATES.xml + TRANS.csv in the current directory, item DM1182
//! rusty-trade
//!
//! # Explicit inputs
//! rusty-trade --rates data/RATES.xml --transactions data/TRANS.csv --item DM1210
//!
//! # Every item, as JSON
//! rusty-trade --all-items --format json
//! ```

use clap::Parser;
use colored::Colorize;
use rusty_trade::config::TradeConfig;
use rusty_trade::engine::TradeEngine;
use rusty_trade::error::Result as TradeResult;
use rusty_trade::report::{ReportFormat, Reporter};
use std::path::PathBuf;
use std::process;

/// rusty-trade: total multi-currency sales in USD
#[derive(Parser)]
#[command(name = "rusty-trade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Resolve FX rates to USD and total an item's sales", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rate file (.xml or .csv)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Transaction CSV file
    #[arg(short, long)]
    transactions: Option<PathBuf>,

    /// Item (SKU) to total
    #[arg(short, long)]
    item: Option<String>,

    /// Report every item instead of one
    #[arg(short, long, conflicts_with = "item")]
    all_items: bool,

    /// Output format (plain, json)
    #[arg(short, long, default_value = "plain")]
    format: String,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn build_config(cli: &Cli) -> TradeResult<TradeConfig> {
    let mut config = TradeConfig::load(cli.config.as_deref())?;
    if let Some(rates) = &cli.rates {
        config.rates_path = rates.clone();
    }
    if let Some(transactions) = &cli.transactions {
        config.transactions_path = transactions.clone();
    }
    if let Some(item) = &cli.item {
        config.item = item.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> TradeResult<String> {
    let format: ReportFormat = cli.format.parse()?;
    let reporter = Reporter::new(format);
    let engine = TradeEngine::new(build_config(cli)?);

    if cli.all_items {
        let totals = engine.run_all_items()?;
        reporter.render_totals(&totals)
    } else {
        let summary = engine.run()?;
        log::info!(
            "{} currencies resolved, {} rates unresolved, {} conflicts",
            summary.currencies,
            summary.unresolved_rates,
            summary.conflicts
        );
        reporter.render_total(&summary.item, summary.total)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
