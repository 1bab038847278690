//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintel - receipt extraction, spending forecasts and budgets
#[derive(Parser)]
#[command(name = "fintel")]
#[command(about = "Extract receipt fields, forecast spending and recommend budgets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip the preferred models and always use the statistical fallbacks
    #[arg(long, global = true)]
    pub fallback_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract receipt fields from recognized text
    Extract {
        /// Text file, or "-" for stdin
        file: PathBuf,
    },

    /// OCR a receipt image and draft an expense from it
    Scan {
        /// Receipt image (PNG, JPEG, ...)
        image: PathBuf,
    },

    /// Forecast monthly spending
    Forecast {
        /// Monthly series as JSON (array or {"monthly_data": [...]}) or CSV (month,total)
        #[arg(long, required_unless_present = "transactions", conflicts_with = "transactions")]
        series: Option<PathBuf>,

        /// Transactions CSV to aggregate into a monthly series
        #[arg(long)]
        transactions: Option<PathBuf>,

        /// Months to forecast (defaults to forecast.default_horizon)
        #[arg(long)]
        horizon: Option<usize>,
    },

    /// Recommend per-category budgets
    Budget {
        /// Category histories as JSON (array or {"category_history": [...]})
        #[arg(long, required_unless_present = "transactions", conflicts_with = "transactions")]
        history: Option<PathBuf>,

        /// Transactions CSV to group into category histories
        #[arg(long)]
        transactions: Option<PathBuf>,
    },

    /// Categorize a transaction description
    Categorize {
        /// Transaction description
        description: String,

        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
    },

    /// Show capabilities and resolved configuration
    Status,
}
