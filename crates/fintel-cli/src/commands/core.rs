//! Shared command utilities
//!
//! - `load_engine` - Resolve config and build the engine
//! - `read_text` - Read a text file or stdin
//! - `load_series` / `load_histories` - Parse pipeline inputs from JSON or CSV

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use fintel_core::{
    category_histories, monthly_totals, read_series, read_transactions, CategoryHistory,
    ConfigSource, Engine, EngineConfig, MonthlyPoint, Transaction,
};
use serde_json::Value;

/// Load config and build the engine
pub fn load_engine(config: Option<&Path>, fallback_only: bool) -> Result<(Engine, ConfigSource)> {
    let (config, source) = EngineConfig::load(config).context("Failed to load config")?;
    let engine = Engine::from_config(config);
    let engine = if fallback_only {
        tracing::debug!("Preferred models disabled by --fallback-only");
        engine.fallback_only()
    } else {
        engine
    };
    Ok((engine, source))
}

/// Read a UTF-8 text file, or stdin when the path is "-"
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Take the array under `key` from a request-shaped object, or the value itself
fn unwrap_list(value: Value, key: &str) -> Result<Value> {
    match value {
        Value::Array(_) => Ok(value),
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| anyhow!("Expected a JSON array or an object with \"{}\"", key)),
        _ => bail!("Expected a JSON array or an object with \"{}\"", key),
    }
}

/// Monthly series plus any horizon given alongside it in JSON
pub struct SeriesInput {
    pub points: Vec<MonthlyPoint>,
    pub horizon: Option<usize>,
}

/// Parse a monthly series from JSON or CSV (by extension)
pub fn load_series(path: &Path) -> Result<SeriesInput> {
    let text = read_text(path)?;
    if is_csv(path) {
        let points = read_series(text.as_bytes())
            .with_context(|| format!("Invalid series CSV {}", path.display()))?;
        return Ok(SeriesInput {
            points,
            horizon: None,
        });
    }

    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let horizon = value
        .get("horizon")
        .and_then(Value::as_u64)
        .map(|h| h as usize);
    let points = serde_json::from_value(unwrap_list(value, "monthly_data")?)
        .context("Invalid monthly series")?;

    Ok(SeriesInput { points, horizon })
}

/// Parse category histories from JSON
pub fn load_histories(path: &Path) -> Result<Vec<CategoryHistory>> {
    let text = read_text(path)?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    serde_json::from_value(unwrap_list(value, "category_history")?)
        .context("Invalid category history")
}

/// Parse a transactions CSV
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let transactions = read_transactions(file)
        .with_context(|| format!("Invalid transactions CSV {}", path.display()))?;
    if transactions.is_empty() {
        bail!("No transactions in {}", path.display());
    }
    Ok(transactions)
}

/// Monthly series aggregated from a transactions CSV
pub fn series_from_transactions(path: &Path) -> Result<Vec<MonthlyPoint>> {
    Ok(monthly_totals(&load_transactions(path)?))
}

/// Category histories grouped from a transactions CSV
pub fn histories_from_transactions(engine: &Engine, path: &Path) -> Result<Vec<CategoryHistory>> {
    Ok(category_histories(
        &load_transactions(path)?,
        engine.classifier(),
    ))
}

/// Format a money amount for display
pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}
