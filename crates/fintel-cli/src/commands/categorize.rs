//! Categorization command

use anyhow::Result;
use fintel_core::Engine;

pub fn cmd_categorize(
    engine: &Engine,
    description: &str,
    merchant: Option<&str>,
    json: bool,
) -> Result<()> {
    let result = engine.categorize(description, merchant);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.matched_keyword_count == 0 {
        println!(
            "{} (no keywords matched, default category)",
            result.category
        );
    } else {
        println!(
            "{} ({:.0}% confidence, {} keyword{})",
            result.category,
            result.confidence * 100.0,
            result.matched_keyword_count,
            if result.matched_keyword_count == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
