//! Field extraction command

use std::path::Path;

use anyhow::Result;
use fintel_core::{Engine, ExtractionResult};

use super::{money, read_text};

pub fn cmd_extract(engine: &Engine, file: &Path, json: bool) -> Result<()> {
    let text = read_text(file)?;
    let result = engine.extract_fields(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_extraction(&result);
    }
    Ok(())
}

pub fn print_extraction(result: &ExtractionResult) {
    let or_none = |v: Option<String>| v.unwrap_or_else(|| "(not found)".to_string());

    println!();
    println!("🧾 Extracted fields");
    println!("   ─────────────────────────────────────────");
    println!("   Merchant:   {}", or_none(result.merchant.clone()));
    println!("   Date:       {}", or_none(result.date.clone()));
    println!("   Amount:     {}", or_none(result.amount.map(money)));
    println!("   Confidence: {:.0}%", result.confidence * 100.0);

    if !result.items.is_empty() {
        println!();
        println!("   Items:");
        for item in &result.items {
            println!("     {:<30} {:>10}", item.name, money(item.price));
        }
    }
    println!();
}
