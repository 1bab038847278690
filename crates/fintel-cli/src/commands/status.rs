//! Status command

use anyhow::Result;
use fintel_core::{ConfigSource, Engine};
use serde_json::json;

fn mark(available: bool) -> &'static str {
    if available {
        "✅"
    } else {
        "❌"
    }
}

pub async fn cmd_status(engine: &Engine, source: &ConfigSource, json: bool) -> Result<()> {
    let caps = engine.capabilities();
    let ocr_healthy = engine.ocr_healthy().await;
    let config = engine.config();

    if json {
        let out = json!({
            "config_source": source.to_string(),
            "capabilities": caps,
            "ocr_healthy": ocr_healthy,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("📊 Fintel Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Config: {}", source);
    println!();
    println!("   {} Seasonal forecast model", mark(caps.seasonal_forecast));
    println!("   {} Gradient boosting budgets", mark(caps.gradient_boosting));
    if caps.ocr {
        println!(
            "   {} OCR ({}{})",
            mark(ocr_healthy),
            config.ocr.backend,
            if ocr_healthy { "" } else { ", not responding" }
        );
    } else {
        println!("   {} OCR (disabled)", mark(false));
    }
    println!();
    println!("   Default horizon: {} months", config.forecast.default_horizon);
    println!(
        "   Categories: {} (default: {})",
        engine.classifier().taxonomy().len(),
        engine.classifier().taxonomy().default_category()
    );
    println!();
    Ok(())
}
