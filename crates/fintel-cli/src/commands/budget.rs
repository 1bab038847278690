//! Budget recommendation command

use std::path::Path;

use anyhow::{bail, Context, Result};
use fintel_core::{Engine, Trend};

use super::{histories_from_transactions, load_histories, money};

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "↑",
        Trend::Decreasing => "↓",
        Trend::Stable => "→",
        Trend::InsufficientData => "?",
    }
}

pub fn cmd_budget(
    engine: &Engine,
    history: Option<&Path>,
    transactions: Option<&Path>,
    json: bool,
) -> Result<()> {
    let histories = match (history, transactions) {
        (Some(path), _) => load_histories(path)?,
        (None, Some(path)) => histories_from_transactions(engine, path)?,
        (None, None) => bail!("Provide --history or --transactions"),
    };

    let recommendations = engine
        .recommend_budget(&histories)
        .context("Budget recommendation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!();
    println!("💰 Budget recommendations");
    println!("   ─────────────────────────────────────────────────────────────────");
    for rec in &recommendations {
        println!(
            "   {:<20} {:>12}  {} {:<17} {:>4.0}%  ({}, {} months)",
            rec.category,
            money(rec.recommended_budget),
            trend_marker(rec.trend),
            rec.trend.as_str(),
            rec.confidence * 100.0,
            rec.method,
            rec.history_months
        );
    }
    println!();
    Ok(())
}
