//! Mock OCR engine for testing

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::RecognizedText;

use super::OcrEngine;

const DEFAULT_TEXT: &str = "MOCK STORE\n01/01/2024\nItem One 100\nTotal: 100.00";

/// Returns the same text for every image
#[derive(Debug, Clone)]
pub struct MockOcr {
    text: String,
    /// Whether recognition and health_check succeed
    pub healthy: bool,
}

impl Default for MockOcr {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT)
    }
}

impl MockOcr {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            healthy: true,
        }
    }

    /// An engine whose every call fails
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::default()
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText> {
        if !self.healthy {
            return Err(Error::Ocr("mock engine is unhealthy".into()));
        }
        if image.is_empty() {
            return Err(Error::Ocr("empty image".into()));
        }
        Ok(RecognizedText::new(self.text.clone()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "mock"
    }
}
