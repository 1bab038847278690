//! Receipt field extraction
//!
//! Turns recognized text into typed fields plus a confidence score:
//! - `patterns` - independent amount/date/merchant/line-item extractors
//! - `confidence` - weighted field-presence score
//!
//! Extraction never fails; missing fields are simply absent.

pub mod confidence;
pub mod patterns;

pub use patterns::{
    extract_amount, extract_date, extract_line_items, extract_merchant, title_case,
};

use crate::models::ExtractionResult;

/// Extract amount, date, merchant and line items from recognized text
pub fn extract_fields(text: impl AsRef<str>) -> ExtractionResult {
    let text = text.as_ref();

    let amount = extract_amount(text);
    let date = extract_date(text);
    let merchant = extract_merchant(text);
    let items = extract_line_items(text);

    let confidence = confidence::score(amount, date.as_deref(), merchant.as_deref(), &items);

    tracing::debug!(
        amount = ?amount,
        date = ?date,
        merchant = ?merchant,
        items = items.len(),
        confidence,
        "Extracted receipt fields"
    );

    ExtractionResult {
        amount,
        date,
        merchant,
        items,
        confidence,
    }
}
