//! Engine facade
//!
//! Resolves capabilities once from config and wires the extraction,
//! forecast, budget and categorization components together. Cheap to clone
//! and safe to share across threads.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::budget::{BudgetPipeline, BudgetRegressor, GradientBoostingRegressor};
use crate::categorize::CategoryClassifier;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::extract;
use crate::forecast::{ForecastPipeline, SeasonalTrendModel, SeriesModel};
use crate::models::{
    BudgetRecommendation, Categorization, CategoryHistory, ExtractionResult, ForecastResult,
    MonthlyPoint,
};
use crate::ocr::{OcrClient, OcrEngine};
use crate::receipt::{self, ReceiptDraft, ReceiptScan};

/// Which preferred capabilities this engine was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub seasonal_forecast: bool,
    pub gradient_boosting: bool,
    pub ocr: bool,
}

#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    classifier: CategoryClassifier,
    forecast: ForecastPipeline,
    budget: BudgetPipeline,
    ocr: Option<OcrClient>,
    reference_date: Option<NaiveDate>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn from_config(config: EngineConfig) -> Self {
        let series_model: Option<Arc<dyn SeriesModel>> = config.forecast.seasonal_model.then(|| {
            Arc::new(SeasonalTrendModel::new(config.forecast.seasonal_params()))
                as Arc<dyn SeriesModel>
        });
        let regressor: Option<Arc<dyn BudgetRegressor>> = config.budget.gradient_boosting.then(|| {
            Arc::new(GradientBoostingRegressor::new(config.budget.boosting_params()))
                as Arc<dyn BudgetRegressor>
        });

        let engine = Self {
            classifier: CategoryClassifier::new(config.taxonomy.build()),
            forecast: ForecastPipeline::new(series_model),
            budget: BudgetPipeline::new(regressor),
            ocr: OcrClient::from_config(&config.ocr),
            reference_date: None,
            config,
        };

        tracing::debug!(capabilities = ?engine.capabilities(), "Engine ready");
        engine
    }

    /// Drop both preferred models so every prediction takes the fallback path
    pub fn fallback_only(mut self) -> Self {
        self.forecast = ForecastPipeline::fallback_only();
        self.budget = BudgetPipeline::fallback_only();
        if let Some(date) = self.reference_date {
            self.forecast = self.forecast.with_reference_date(date);
        }
        self
    }

    /// Pin "today" for fallback forecast months and receipt drafts
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self.forecast = self.forecast.with_reference_date(date);
        self
    }

    pub fn with_ocr(mut self, ocr: Option<OcrClient>) -> Self {
        self.ocr = ocr;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            seasonal_forecast: self.forecast.has_preferred(),
            gradient_boosting: self.budget.has_preferred(),
            ocr: self.ocr.is_some(),
        }
    }

    /// Months forecast when the caller does not choose
    pub fn default_horizon(&self) -> usize {
        self.config.forecast.default_horizon
    }

    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn extract_fields(&self, text: &str) -> ExtractionResult {
        extract::extract_fields(text)
    }

    pub fn forecast(&self, history: &[MonthlyPoint], horizon: usize) -> Result<ForecastResult> {
        self.forecast.forecast(history, horizon)
    }

    pub fn recommend_budget(&self, histories: &[CategoryHistory]) -> Result<Vec<BudgetRecommendation>> {
        self.budget.recommend(histories)
    }

    pub fn categorize(&self, description: &str, merchant: Option<&str>) -> Categorization {
        self.classifier.categorize(description, merchant)
    }

    /// OCR an image and extract receipt fields
    pub async fn scan_receipt(&self, image: &[u8]) -> Result<ReceiptScan> {
        let ocr = self
            .ocr
            .as_ref()
            .ok_or_else(|| Error::Ocr("OCR is disabled (ocr.backend = \"none\")".into()))?;
        receipt::scan_receipt(ocr, image).await
    }

    /// Draft an expense from an extraction
    pub fn draft(&self, extraction: &ExtractionResult) -> ReceiptDraft {
        ReceiptDraft::from_scan(extraction, &self.classifier, self.today())
    }

    /// Whether the configured OCR engine responds
    pub async fn ocr_healthy(&self) -> bool {
        match &self.ocr {
            Some(ocr) => ocr.health_check().await,
            None => false,
        }
    }
}
