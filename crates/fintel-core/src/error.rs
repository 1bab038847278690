//! Error types for fintel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient data: need at least {required} monthly points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Category history is required")]
    MissingHistory,

    #[error("Invalid forecast horizon: {0} (must be at least 1 and stay within the calendar)")]
    InvalidHorizon(usize),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Caller-input errors: reported as-is and never retried
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData { .. } | Error::MissingHistory | Error::InvalidHorizon(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a preferred model.
///
/// Never surfaced to callers: pipelines branch on it and route to their
/// statistical fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The capability is not present in this process
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The model is present but failed during fit or predict
    #[error("model failed: {0}")]
    Runtime(String),
}
