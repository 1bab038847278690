//! Receipt scan command

use std::path::Path;

use anyhow::{bail, Context, Result};
use fintel_core::Engine;
use serde_json::json;

use super::{money, print_extraction};

pub async fn cmd_scan(engine: &Engine, image: &Path, json: bool) -> Result<()> {
    if !engine.capabilities().ocr {
        bail!("OCR is disabled; set ocr.backend in the config");
    }

    let bytes =
        std::fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;
    let scan = engine
        .scan_receipt(&bytes)
        .await
        .with_context(|| format!("Failed to scan {}", image.display()))?;
    let draft = engine.draft(&scan.extraction);

    if json {
        let out = json!({ "scan": scan, "draft": draft });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_extraction(&scan.extraction);
    println!("📝 Draft expense ({} ms)", scan.processing_time_ms);
    println!("   {}", draft.description);
    println!("   Date:     {}", draft.date);
    println!(
        "   Amount:   {}",
        draft.amount.map(money).unwrap_or_else(|| "(enter manually)".into())
    );
    println!(
        "   Category: {} ({:.0}%)",
        draft.category,
        draft.category_confidence * 100.0
    );
    println!();
    Ok(())
}
