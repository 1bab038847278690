//! Fintel Core Library
//!
//! Financial intelligence for personal spending:
//! - Receipt field extraction from recognized (OCR) text
//! - Spending forecasts with a seasonal/trend model and a statistical fallback
//! - Per-category budget recommendations (gradient boosting or statistical)
//! - Keyword categorization against a shared taxonomy
//! - Pluggable OCR engines (tesseract, mock)
//! - CSV transaction history aggregation

pub mod budget;
pub mod categorize;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod forecast;
pub mod history;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod stats;

/// Test utilities: fixtures and scripted model doubles
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{BudgetPipeline, BudgetRegressor, GradientBoostingRegressor, RegressionOutcome};
pub use categorize::{CategoryClassifier, CategoryKeywords, CategoryTaxonomy};
pub use config::{ConfigSource, EngineConfig, OcrBackend};
pub use engine::{Capabilities, Engine};
pub use error::{Error, ModelError, Result};
pub use extract::extract_fields;
pub use forecast::{ForecastPipeline, SeasonalTrendModel, SeriesModel, StatisticalForecaster};
pub use history::{category_histories, monthly_totals, read_series, read_transactions, Transaction};
pub use models::{
    BudgetMethod, BudgetRecommendation, Categorization, CategoryHistory, ExtractionResult,
    ForecastMetrics, ForecastModel, ForecastPoint, ForecastResult, LineItem, MonthlyPoint,
    RecognizedText, Trend,
};
pub use ocr::{MockOcr, OcrClient, OcrEngine, TesseractEngine};
pub use receipt::{scan_receipt, ReceiptDraft, ReceiptScan};
