//! Pluggable OCR engine abstraction
//!
//! Receipt scanning needs recognized text from an image. The engine is an
//! external collaborator, so it sits behind a trait.
//!
//! # Architecture
//!
//! - `OcrEngine` trait: the interface every engine implements
//! - `OcrClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Engines: `TesseractEngine` (external `tesseract` command), `MockOcr`

mod mock;
mod tesseract;

pub use mock::MockOcr;
pub use tesseract::TesseractEngine;

use async_trait::async_trait;

use crate::config::{OcrBackend, OcrConfig};
use crate::error::Result;
use crate::models::RecognizedText;

/// Interface for OCR engines
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image (PNG, JPEG, ...)
    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText>;

    /// Check if the engine can be used
    async fn health_check(&self) -> bool;

    /// Engine name (for logging)
    fn name(&self) -> &str;
}

/// Concrete OCR client enum
#[derive(Debug, Clone)]
pub enum OcrClient {
    /// Local tesseract binary
    Tesseract(TesseractEngine),
    /// Fixed text, for tests and demos
    Mock(MockOcr),
}

impl OcrClient {
    /// Build the configured engine; `None` when OCR is disabled
    pub fn from_config(config: &OcrConfig) -> Option<Self> {
        match config.backend {
            OcrBackend::Tesseract => Some(OcrClient::Tesseract(TesseractEngine::new(
                &config.command,
                &config.language,
            ))),
            OcrBackend::Mock => Some(OcrClient::Mock(match &config.mock_text {
                Some(text) => MockOcr::new(text),
                None => MockOcr::default(),
            })),
            OcrBackend::None => None,
        }
    }

    /// Create a mock engine returning `text`
    pub fn mock(text: &str) -> Self {
        OcrClient::Mock(MockOcr::new(text))
    }
}

#[async_trait]
impl OcrEngine for OcrClient {
    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText> {
        match self {
            OcrClient::Tesseract(e) => e.recognize(image).await,
            OcrClient::Mock(e) => e.recognize(image).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            OcrClient::Tesseract(e) => e.health_check().await,
            OcrClient::Mock(e) => e.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            OcrClient::Tesseract(e) => e.name(),
            OcrClient::Mock(e) => e.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = OcrConfig::default();
        assert!(matches!(
            OcrClient::from_config(&config),
            Some(OcrClient::Tesseract(_))
        ));

        config.backend = OcrBackend::Mock;
        config.mock_text = Some("hello".into());
        let client = OcrClient::from_config(&config).unwrap();
        assert_eq!(client.name(), "mock");

        config.backend = OcrBackend::None;
        assert!(OcrClient::from_config(&config).is_none());
    }

    #[tokio::test]
    async fn test_client_delegates() {
        let client = OcrClient::mock("TOTAL 10.00");
        assert!(client.health_check().await);
        let text = client.recognize(b"\x89PNG").await.unwrap();
        assert_eq!(text.as_str(), "TOTAL 10.00");
    }
}
