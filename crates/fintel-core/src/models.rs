//! Data models for fintel
//!
//! Every type here is created once per pipeline call and returned by value;
//! none of them is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw output of an OCR engine. No structure is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecognizedText(String);

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RecognizedText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecognizedText {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for RecognizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecognizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line item pulled from receipt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: f64,
}

/// Fields extracted from one piece of recognized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Receipt total, rounded to 2 places
    pub amount: Option<f64>,
    /// `YYYY-MM-DD` as printed (components zero-padded, not calendar-checked)
    pub date: Option<String>,
    /// Title-cased merchant name
    pub merchant: Option<String>,
    pub items: Vec<LineItem>,
    /// Weighted field presence in [0, 1], rounded to 2 places
    pub confidence: f64,
}

impl ExtractionResult {
    /// The extracted date as a calendar date, if it is a real one
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// One month of total spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default, alias = "y")]
    pub total: f64,
}

impl MonthlyPoint {
    pub fn new(month: impl Into<String>, total: f64) -> Self {
        Self {
            month: month.into(),
            total,
        }
    }
}

/// Which strategy produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    /// Preferred seasonal/trend model
    SeasonalTrend,
    /// Linear trend + dispersion estimator
    StatisticalFallback,
}

impl ForecastModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::SeasonalTrend => "seasonal_trend",
            ForecastModel::StatisticalFallback => "statistical_fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ForecastModel::StatisticalFallback)
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A predicted month. Invariant: `0 <= lower <= predicted <= upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// One point per forecast month, `len() == horizon`
    pub points: Vec<ForecastPoint>,
    pub model: ForecastModel,
    /// Number of historical points the model saw
    pub data_points: usize,
    pub metrics: ForecastMetrics,
}

/// Monthly spending history for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHistory {
    #[serde(default = "unknown_category")]
    pub category: String,
    /// Chronological
    #[serde(default)]
    pub monthly_totals: Vec<f64>,
}

fn unknown_category() -> String {
    "Unknown".to_string()
}

impl CategoryHistory {
    pub fn new(category: impl Into<String>, monthly_totals: Vec<f64>) -> Self {
        Self {
            category: category.into(),
            monthly_totals,
        }
    }
}

/// How a budget recommendation was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMethod {
    /// Fewer than 2 months of history: average plus buffer
    AverageFallback,
    /// Recency-weighted mean plus dispersion
    Statistical,
    /// Preferred regression model
    GradientBoosting,
}

impl BudgetMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetMethod::AverageFallback => "average_fallback",
            BudgetMethod::Statistical => "statistical",
            BudgetMethod::GradientBoosting => "gradient_boosting",
        }
    }
}

impl fmt::Display for BudgetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of recent spending relative to history (±5% band)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }

    /// Classify `recent` against `baseline` with a ±5% dead band
    pub fn classify(recent: f64, baseline: f64) -> Self {
        if recent > baseline * 1.05 {
            Trend::Increasing
        } else if recent < baseline * 0.95 {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increasing" => Ok(Trend::Increasing),
            "decreasing" => Ok(Trend::Decreasing),
            "stable" => Ok(Trend::Stable),
            "insufficient_data" => Ok(Trend::InsufficientData),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    /// `predicted_spending` plus buffer, never negative
    pub recommended_budget: f64,
    /// Estimate before the buffer is applied
    pub predicted_spending: Option<f64>,
    pub confidence: f64,
    pub method: BudgetMethod,
    pub trend: Trend,
    pub history_months: usize,
}

/// Result of keyword categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: String,
    pub confidence: f64,
    pub matched_keyword_count: usize,
}
