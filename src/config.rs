//! Command-line configuration. Every option can also be set from the
//! environment.

use crate::money::DEFAULT_CURRENCY_SYMBOL;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Interactive bank account ledger")]
pub struct Config {
    /// Where the ledger is saved between sessions.
    #[arg(long, env = "BANK_DATA_FILE", default_value = "bank_data.json")]
    pub data_file: PathBuf,

    /// CSV of accounts to open at startup (`type,holder,balance,parameter`).
    #[arg(long, value_name = "CSV")]
    pub import: Option<PathBuf>,

    /// Write a CSV summary of every account here on exit.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    #[arg(long, env = "BANK_CURRENCY_SYMBOL", default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency_symbol: String,

    /// Used when `RUST_LOG` isn't set.
    #[arg(long, env = "BANK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
