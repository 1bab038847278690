//! Fintel CLI - receipt extraction, spending forecasts and budgets
//!
//! Usage:
//!   fintel extract receipt.txt              Extract fields from OCR text
//!   fintel scan receipt.jpg                 OCR an image and draft an expense
//!   fintel forecast --series months.json    Forecast monthly spending
//!   fintel budget --transactions tx.csv     Recommend category budgets
//!   fintel categorize "uber to airport"     Categorize a description

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let (engine, source) = commands::load_engine(cli.config.as_deref(), cli.fallback_only)?;

    match cli.command {
        Commands::Extract { file } => commands::cmd_extract(&engine, &file, cli.json),
        Commands::Scan { image } => commands::cmd_scan(&engine, &image, cli.json).await,
        Commands::Forecast {
            series,
            transactions,
            horizon,
        } => commands::cmd_forecast(
            &engine,
            series.as_deref(),
            transactions.as_deref(),
            horizon,
            cli.json,
        ),
        Commands::Budget {
            history,
            transactions,
        } => commands::cmd_budget(&engine, history.as_deref(), transactions.as_deref(), cli.json),
        Commands::Categorize {
            description,
            merchant,
        } => commands::cmd_categorize(&engine, &description, merchant.as_deref(), cli.json),
        Commands::Status => commands::cmd_status(&engine, &source, cli.json).await,
    }
}
