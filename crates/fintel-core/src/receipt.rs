//! Receipt scanning: OCR, field extraction, and a draft expense

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::categorize::CategoryClassifier;
use crate::error::Result;
use crate::extract::extract_fields;
use crate::models::{ExtractionResult, LineItem};
use crate::ocr::OcrEngine;

/// Output of scanning one receipt image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptScan {
    pub raw_text: String,
    pub extraction: ExtractionResult,
    pub processing_time_ms: u64,
}

/// Run OCR on an image and extract receipt fields from the text
pub async fn scan_receipt<E>(ocr: &E, image: &[u8]) -> Result<ReceiptScan>
where
    E: OcrEngine + ?Sized,
{
    let started = Instant::now();
    let text = ocr.recognize(image).await?;
    let extraction = extract_fields(&text);
    let processing_time_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        engine = ocr.name(),
        confidence = extraction.confidence,
        processing_time_ms,
        "Receipt scanned"
    );

    Ok(ReceiptScan {
        raw_text: text.into_inner(),
        extraction,
        processing_time_ms,
    })
}

/// Expense transaction proposed from a scanned receipt, pending confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    pub amount: Option<f64>,
    pub date: NaiveDate,
    pub merchant: Option<String>,
    pub description: String,
    pub category: String,
    pub category_confidence: f64,
    pub items: Vec<LineItem>,
}

impl ReceiptDraft {
    /// Build a draft; `today` stands in for a missing or invalid date
    pub fn from_scan(
        extraction: &ExtractionResult,
        classifier: &CategoryClassifier,
        today: NaiveDate,
    ) -> Self {
        let merchant = extraction.merchant.clone();
        let description = match &merchant {
            Some(name) => format!("Receipt: {}", name),
            None => "Receipt".to_string(),
        };
        let categorization = classifier.categorize(&description, merchant.as_deref());

        Self {
            amount: extraction.amount,
            date: extraction.parsed_date().unwrap_or(today),
            merchant,
            description,
            category: categorization.category,
            category_confidence: categorization.confidence,
            items: extraction.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{MockOcr, OcrClient};
    use crate::test_utils::SAMPLE_RECEIPT;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_scan_with_mock_engine() {
        let ocr = OcrClient::mock(SAMPLE_RECEIPT);
        let scan = scan_receipt(&ocr, b"fake image bytes").await.unwrap();

        assert_eq!(scan.raw_text, SAMPLE_RECEIPT);
        assert_eq!(scan.extraction.amount, Some(400.0));
        assert_eq!(scan.extraction.merchant.as_deref(), Some("Starbucks"));
        assert_eq!(scan.extraction.date.as_deref(), Some("2024-03-12"));
    }

    #[tokio::test]
    async fn test_scan_failure_surfaces() {
        let ocr = MockOcr::unhealthy();
        let err = scan_receipt(&ocr, b"img").await.unwrap_err();
        assert!(matches!(err, crate::Error::Ocr(_)));
    }

    #[test]
    fn test_draft_from_extraction() {
        let extraction = extract_fields(SAMPLE_RECEIPT);
        let draft = ReceiptDraft::from_scan(&extraction, &CategoryClassifier::default(), today());

        assert_eq!(draft.amount, Some(400.0));
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(draft.description, "Receipt: Starbucks");
        assert_eq!(draft.category, "Food & Dining");
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_draft_without_merchant_or_date() {
        let extraction = extract_fields("1234\n5678\n99.50");
        let draft = ReceiptDraft::from_scan(&extraction, &CategoryClassifier::default(), today());

        assert_eq!(draft.merchant, None);
        assert_eq!(draft.description, "Receipt");
        assert_eq!(draft.date, today());
        assert_eq!(draft.category, "Shopping");
    }

    #[test]
    fn test_draft_replaces_impossible_date() {
        let extraction = extract_fields("CORNER SHOP\n31/02/2024\nTotal: 10.00");
        assert_eq!(extraction.date.as_deref(), Some("2024-02-31"));

        let draft = ReceiptDraft::from_scan(&extraction, &CategoryClassifier::default(), today());
        assert_eq!(draft.date, today());
    }
}
