//! Extraction confidence scoring

use crate::models::LineItem;
use crate::stats::round_to;

pub const AMOUNT_WEIGHT: f64 = 0.4;
pub const DATE_WEIGHT: f64 = 0.2;
pub const MERCHANT_WEIGHT: f64 = 0.2;
pub const ITEMS_WEIGHT: f64 = 0.2;

/// Weighted presence of the four extracted fields, rounded to 2 places.
///
/// Fields only ever add to the score; all four present gives 1.0. A zero
/// amount is treated as no amount.
pub fn score(
    amount: Option<f64>,
    date: Option<&str>,
    merchant: Option<&str>,
    items: &[LineItem],
) -> f64 {
    let mut confidence = 0.0;
    if amount.is_some_and(|a| a != 0.0) {
        confidence += AMOUNT_WEIGHT;
    }
    if date.is_some() {
        confidence += DATE_WEIGHT;
    }
    if merchant.is_some() {
        confidence += MERCHANT_WEIGHT;
    }
    if !items.is_empty() {
        confidence += ITEMS_WEIGHT;
    }
    round_to(confidence, 2)
}
