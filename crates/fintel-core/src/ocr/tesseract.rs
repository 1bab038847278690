//! Tesseract OCR engine
//!
//! Stages the image in a temp file and runs `tesseract <image> stdout -l <lang>`.
//! Grayscale conversion and binarization are left to tesseract's own
//! preprocessing.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::models::RecognizedText;

use super::OcrEngine;

#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    language: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl TesseractEngine {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText> {
        if image.is_empty() {
            return Err(Error::Ocr("empty image".into()));
        }

        // Removed when `staged` drops
        let staged = tempfile::Builder::new()
            .prefix("fintel-receipt-")
            .tempfile()?;
        tokio::fs::write(staged.path(), image).await?;

        tracing::info!(
            command = %self.command,
            language = %self.language,
            bytes = image.len(),
            "Running OCR"
        );

        let output = Command::new(&self.command)
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output()
            .await;

        match output {
            Ok(result) if result.status.success() => {
                let text = String::from_utf8_lossy(&result.stdout).into_owned();
                tracing::debug!(chars = text.len(), "OCR complete");
                Ok(RecognizedText::new(text))
            }
            Ok(result) => Err(Error::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ))),
            Err(e) => Err(Error::Ocr(format!(
                "Failed to run {}: {}. Is tesseract installed?",
                self.command, e
            ))),
        }
    }

    async fn health_check(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_ocr_error() {
        let engine = TesseractEngine::new("fintel-no-such-ocr-binary", "eng");
        assert!(!engine.health_check().await);

        let err = engine.recognize(b"not really an image").await.unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_image_staged_for_command() {
        // `sh <staged> stdout -l eng` runs the staged bytes as a script
        let engine = TesseractEngine::new("sh", "eng");
        let text = engine.recognize(b"echo 'TOTAL 12.00'\n").await.unwrap();
        assert_eq!(text.as_str().trim(), "TOTAL 12.00");
    }

    #[tokio::test]
    async fn test_empty_image_rejected() {
        let err = TesseractEngine::default().recognize(&[]).await.unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
    }
}
