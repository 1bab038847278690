//! Spending forecast command

use std::path::Path;

use anyhow::{bail, Context, Result};
use fintel_core::Engine;

use super::{load_series, money, series_from_transactions};

pub fn cmd_forecast(
    engine: &Engine,
    series: Option<&Path>,
    transactions: Option<&Path>,
    horizon: Option<usize>,
    json: bool,
) -> Result<()> {
    let (points, file_horizon) = match (series, transactions) {
        (Some(path), _) => {
            let input = load_series(path)?;
            (input.points, input.horizon)
        }
        (None, Some(path)) => (series_from_transactions(path)?, None),
        (None, None) => bail!("Provide --series or --transactions"),
    };

    let horizon = horizon
        .or(file_horizon)
        .unwrap_or_else(|| engine.default_horizon());
    let result = engine
        .forecast(&points, horizon)
        .context("Forecast failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "📈 Forecast ({} months of history, model: {})",
        result.data_points, result.model
    );
    println!("   ─────────────────────────────────────────────────────────");
    println!(
        "   {:<8} {:>12} {:>12} {:>12} {:>6}",
        "Month", "Predicted", "Low", "High", "Conf"
    );
    for p in &result.points {
        println!(
            "   {:<8} {:>12} {:>12} {:>12} {:>5.0}%",
            p.month,
            money(p.predicted),
            money(p.lower),
            money(p.upper),
            p.confidence * 100.0
        );
    }
    println!();
    println!(
        "   MAE {}  RMSE {}  MAPE {:.1}%",
        money(result.metrics.mae),
        money(result.metrics.rmse),
        result.metrics.mape
    );
    println!();
    Ok(())
}
